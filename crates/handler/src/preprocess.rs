use base64::Engine;
use serde_json::{Map, Value};

use crate::error::{Fault, HttpError};
use crate::event::Event;

/// Body decoding applied before the logic handler runs. Failures surface as
/// normalized faults and flow through the same error path as handler failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessor {
    Passthrough,
    JsonBody,
    Base64Raw,
    Base64Form,
}

impl Preprocessor {
    pub fn apply(&self, event: Event) -> Result<Event, Fault> {
        match self {
            Preprocessor::Passthrough => Ok(event),
            Preprocessor::JsonBody => decode_json_body(event),
            Preprocessor::Base64Raw => {
                let text = decode_base64_body(&event)?;
                Ok(event.with_body(Value::String(text)))
            }
            Preprocessor::Base64Form => {
                let text = decode_base64_body(&event)?;
                let form = parse_form(&text)?;
                Ok(event.with_body(Value::Object(form)))
            }
        }
    }
}

fn decode_json_body(event: Event) -> Result<Event, Fault> {
    let raw = match event.body() {
        Some(Value::String(raw)) if !raw.is_empty() => raw.clone(),
        _ => return Ok(event),
    };
    let parsed: Value = serde_json::from_str(&raw)
        .map_err(|_| HttpError::implementation("Invalid body JSON"))?;
    Ok(event.with_body(parsed))
}

fn decode_base64_body(event: &Event) -> Result<String, Fault> {
    let Some(raw) = event.body64() else {
        return Err(HttpError::validation("Missing body64 field").into());
    };
    // Both bodies at once is ambiguous input, not a recoverable overlap.
    if event.body().is_some() {
        return Err(HttpError::validation("Both body and body64 are present").into());
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(raw.as_bytes())
        .map_err(|err| HttpError::validation(format!("Invalid base64 body: {}", err)))?;
    String::from_utf8(bytes)
        .map_err(|err| HttpError::validation(format!("Invalid base64 body: {}", err)).into())
}

/// All-or-nothing: one malformed pair discards everything decoded so far.
fn parse_form(text: &str) -> Result<Map<String, Value>, Fault> {
    let mut form = Map::new();
    for pair in text.split('&') {
        let mut parts = pair.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(HttpError::validation(format!("Malformed form pair: {}", pair)).into());
        };
        form.insert(
            decode_form_component(key)?,
            Value::String(decode_form_component(value)?),
        );
    }
    Ok(form)
}

fn decode_form_component(part: &str) -> Result<String, Fault> {
    let spaced = part.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| HttpError::validation(format!("Malformed form value: {}", err)).into())
}
