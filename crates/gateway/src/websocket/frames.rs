//! JSON text framing: `{"event": "<name>", "data": <payload>}`.

use chatzen_chats::{ClientEvent, ServerEvent};
use serde_json::Value;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

/// Inbound event names this client understands
const SERVER_EVENTS: &[&str] = &["connected", "typing", "stop typing", "message received"];

pub fn encode_frame(event: &ClientEvent) -> GatewayResult<String> {
    Ok(serde_json::to_string(event)?)
}

/// Decode an inbound frame. Unknown events yield `None`.
pub fn decode_frame(text: &str) -> GatewayResult<Option<ServerEvent>> {
    let value: Value = serde_json::from_str(text)?;
    let name = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::invalid_frame("frame has no event name"))?;

    if !SERVER_EVENTS.contains(&name) {
        debug!(event = %name, "ignoring unknown event");
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}
