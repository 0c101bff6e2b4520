use serde::Serialize;
use serde_json::Value;

use crate::error::ConsoleError;

/// Messages the console can send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum OutboundMessage {
    Ping,
    Text { text: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    /// Compact JSON, as transmitted.
    pub fn to_wire(&self) -> Result<String, ConsoleError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<Value, ConsoleError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Display form of a JSON value: strings as-is, everything else pretty-printed.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
