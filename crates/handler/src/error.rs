use std::fmt;

use serde_json::{Map, Value};

/// A deliberately raised error that carries its own response status and a
/// payload object with at least a `message` field.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    pub status: u16,
    pub payload: Map<String, Value>,
}

impl HttpError {
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("message".to_string(), Value::String(message.into()));
        Self { status, payload }
    }

    /// Client-caused failure, status 400.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_status(400, message)
    }

    /// Server-caused failure, status 500.
    pub fn implementation(message: impl Into<String>) -> Self {
        Self::with_status(500, message)
    }

    /// Attach an extra payload field next to `message`.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    pub fn message(&self) -> &str {
        self.payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message())
    }
}

impl std::error::Error for HttpError {}

/// What a pipeline stage or the logic handler failed with. Structured errors
/// keep their own status; anything else is shaped into a generic 500 by the
/// API recoverer.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    Http(HttpError),
    Other(String),
}

impl Fault {
    pub fn message(&self) -> &str {
        match self {
            Fault::Http(error) => error.message(),
            Fault::Other(message) => message,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Http(error) => error.fmt(f),
            Fault::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Fault {}

impl From<HttpError> for Fault {
    fn from(error: HttpError) -> Self {
        Fault::Http(error)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Fault::Other(message)
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Fault::Other(message.to_string())
    }
}

impl From<serde_json::Error> for Fault {
    fn from(err: serde_json::Error) -> Self {
        Fault::Other(err.to_string())
    }
}
