use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One trigger payload: an open JSON object that may carry `body`, `body64`,
/// `httpMethod` or a `warmupOnly` marker alongside arbitrary trigger fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn body(&self) -> Option<&Value> {
        self.fields.get("body")
    }

    pub fn body64(&self) -> Option<&str> {
        self.fields.get("body64").and_then(Value::as_str)
    }

    pub fn http_method(&self) -> Option<&str> {
        self.fields.get("httpMethod").and_then(Value::as_str)
    }

    /// Strict check: only a boolean `true` marks a warm-up invocation.
    pub fn warmup_only(&self) -> bool {
        matches!(self.fields.get("warmupOnly"), Some(Value::Bool(true)))
    }

    /// New event with `body` replaced; the source event is left untouched.
    pub fn with_body(&self, body: Value) -> Self {
        let mut fields = self.fields.clone();
        fields.insert("body".to_string(), body);
        Self { fields }
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Invocation metadata supplied by the hosting runtime, passed through to the
/// logic handler unmodified. Unknown fields survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallContext {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub function_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
