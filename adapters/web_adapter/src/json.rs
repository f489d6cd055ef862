use serde::de::DeserializeOwned;
use serde_json::Value;
use wishlist_core::ports::Result;
use wishlist_core::Error;

pub fn parse<T: DeserializeOwned>(source_name: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::malformed(source_name, e))
}

/// Vendor ids arrive as JSON numbers or strings; both become the decimal string.
pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
