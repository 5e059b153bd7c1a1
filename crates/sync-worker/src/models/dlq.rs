use base64::engine::{general_purpose, Engine as _};
use serde_json::{json, Value};

/// Dead-letter body for a payload that is not valid UTF-8
pub fn dlq_invalid_utf8(payload_bytes: &[u8], error: &str, ts: i64) -> Value {
  json!({
    "original_bytes_base64": general_purpose::STANDARD.encode(payload_bytes),
    "error": format!("invalid utf8: {}", error),
    "ts": ts
  })
}

/// Dead-letter body for a payload that failed decoding or handling. The
/// original is embedded as JSON when it parses, as a string otherwise.
pub fn dlq_processing_error(payload: &str, error: &str, ts: i64) -> Value {
  let original = serde_json::from_str::<Value>(payload).unwrap_or(Value::String(payload.to_string()));
  json!({
    "original": original,
    "error": error,
    "ts": ts
  })
}
