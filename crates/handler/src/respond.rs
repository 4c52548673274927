use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::envelope::ResponseEnvelope;
use crate::error::{Fault, HttpError};
use crate::pipeline::Reply;

/// Side-effect hook invoked with the raw fault before normalization. Never
/// alters control flow.
pub type ErrorPreHandler = Arc<dyn Fn(&Fault) + Send + Sync>;

/// Configuration for the API-shaped responder and recoverer.
#[derive(Clone, Default)]
pub struct ApiOptions {
    pub headers: HashMap<String, String>,
    pub data_headers: Option<HashMap<String, String>>,
    pub error_headers: Option<HashMap<String, String>>,
    pub error_pre_handler: Option<ErrorPreHandler>,
}

impl ApiOptions {
    pub fn headers_for_data(&self) -> HashMap<String, String> {
        self.data_headers.clone().unwrap_or_else(|| self.headers.clone())
    }

    pub fn headers_for_error(&self) -> HashMap<String, String> {
        self.error_headers.clone().unwrap_or_else(|| self.headers.clone())
    }
}

/// Turns the resolved logic value into the terminal success action.
#[derive(Clone)]
pub enum Responder {
    Passthrough,
    Api { headers: HashMap<String, String> },
}

impl Responder {
    pub fn shape(&self, value: Value) -> Result<Reply, Fault> {
        match self {
            Responder::Passthrough => Ok(Reply::Raw(value)),
            Responder::Api { headers } => shape_api(value, headers).map(Reply::Http),
        }
    }
}

fn shape_api(value: Value, defaults: &HashMap<String, String>) -> Result<ResponseEnvelope, Fault> {
    if let Value::Object(map) = &value {
        if let Some(code) = map.get("statusCode") {
            let status = code
                .as_u64()
                .and_then(|status| u16::try_from(status).ok())
                .ok_or_else(|| HttpError::implementation("Data handler returned invalid status code"))?;
            let body = map.get("body").cloned().unwrap_or_else(|| Value::String(String::new()));
            let headers = match map.get("headers") {
                Some(Value::Object(own)) => own
                    .iter()
                    .map(|(key, value)| (key.clone(), header_text(value)))
                    .collect(),
                _ => defaults.clone(),
            };
            return Ok(ResponseEnvelope {
                status,
                headers,
                body: stringify_body(body),
            });
        }
    }
    Ok(ResponseEnvelope {
        status: 200,
        headers: defaults.clone(),
        body: stringify_body(value),
    })
}

/// Non-string bodies go out as their JSON serialization.
fn stringify_body(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn header_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
