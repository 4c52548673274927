use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The wire response every API-shaped handler produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "statusCode")]
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}
