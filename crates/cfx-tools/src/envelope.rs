//! Result envelopes returned by every tool.
//!
//! Success: `{"status": "success", ...payload}`.
//! Failure: `{"status": "error", "message": "..."}`.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::error::ToolError;
use crate::registry::ToolResult;

/// Success envelope carrying `payload` fields.
pub(crate) fn success(payload: Map<String, Value>) -> Value {
    let mut envelope = Map::with_capacity(payload.len() + 1);
    envelope.insert("status".to_owned(), json!("success"));
    envelope.extend(payload);
    Value::Object(envelope)
}

/// Error envelope for a failed remote call.
pub(crate) fn failure(tool: &str, err: &impl Display) -> Value {
    warn!(tool, error = %err, "Tool call failed");
    json!({"status": "error", "message": err.to_string()})
}

/// Success envelope with one entity under `key`.
pub(crate) fn single<T: Serialize>(key: &str, entity: &T) -> ToolResult {
    let mut payload = Map::new();
    payload.insert(key.to_owned(), serde_json::to_value(entity)?);
    Ok(success(payload))
}

/// Success envelope with a list under `key` and its `count`.
pub(crate) fn list<T: Serialize>(key: &str, entities: &[T]) -> ToolResult {
    let mut payload = Map::new();
    payload.insert(key.to_owned(), serde_json::to_value(entities)?);
    payload.insert("count".to_owned(), json!(entities.len()));
    Ok(success(payload))
}

/// Build the envelope for a gateway result.
pub(crate) fn respond<T, E: Display>(
    tool: &'static str,
    result: Result<T, E>,
    render: impl FnOnce(T) -> Result<Value, ToolError>,
) -> ToolResult {
    match result {
        Ok(value) => render(value),
        Err(err) => Ok(failure(tool, &err)),
    }
}
