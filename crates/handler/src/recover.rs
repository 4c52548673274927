use std::collections::HashMap;

use serde_json::Value;

use crate::envelope::ResponseEnvelope;
use crate::error::{Fault, HttpError};
use crate::pipeline::Reply;
use crate::respond::ErrorPreHandler;

const GENERIC_MESSAGE: &str = "Internal error";

/// Turns a caught fault into the terminal failure action. The API variant
/// always produces a well-formed response; the passthrough variant forwards
/// the raw fault as the callback's error argument.
#[derive(Clone)]
pub enum Recoverer {
    Passthrough,
    Api {
        headers: HashMap<String, String>,
        pre_handler: Option<ErrorPreHandler>,
    },
}

impl Recoverer {
    pub fn recover(&self, fault: Fault) -> Result<Reply, Fault> {
        match self {
            Recoverer::Passthrough => Err(fault),
            Recoverer::Api { headers, pre_handler } => {
                if let Some(hook) = pre_handler {
                    hook(&fault);
                }
                let error = normalize(fault);
                let body = Value::Object(error.payload).to_string();
                Ok(Reply::Http(ResponseEnvelope {
                    status: error.status,
                    headers: headers.clone(),
                    body,
                }))
            }
        }
    }
}

fn normalize(fault: Fault) -> HttpError {
    match fault {
        Fault::Http(error) => error,
        Fault::Other(message) => {
            let message = if message.is_empty() {
                GENERIC_MESSAGE.to_string()
            } else {
                message
            };
            HttpError::implementation(message)
        }
    }
}
