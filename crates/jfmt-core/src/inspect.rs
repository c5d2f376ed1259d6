use serde::Serialize;
use serde_json::Value;

/// Outcome of a strict validity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Strict check, no repair attempted.
pub fn validate(text: &str) -> Validation {
    match serde_json::from_str::<Value>(text) {
        Ok(_) => Validation {
            valid: true,
            error: None,
        },
        Err(e) => Validation {
            valid: false,
            error: Some(e.to_string()),
        },
    }
}

/// Name of the JSON type at the document root.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
    }
}

/// Size of the text in UTF-8 bytes.
pub fn json_size(text: &str) -> usize {
    text.len()
}
