pub mod dispatch;
pub mod edit_state;
pub mod engine_state;
pub mod messages;

pub use dispatch::dispatch;
pub use edit_state::EditState;
pub use engine_state::{BridgeError, EngineState};
pub use messages::{EngineToUi, OperationReport, UiToEngine};

/// Process a JSON message from the UI and return a JSON response.
///
/// The input should be a JSON-serialized [`UiToEngine`] message. Returns a
/// JSON-serialized [`EngineToUi`] response; a message that fails to parse
/// yields an `Error` response.
pub fn process_message(state: &mut EngineState, json_input: &str) -> String {
    let response = match serde_json::from_str::<UiToEngine>(json_input) {
        Ok(msg) => dispatch(state, msg),
        Err(e) => EngineToUi::Error {
            message: format!("Failed to parse message: {}", e),
        },
    };
    encode(&response).unwrap_or_else(|e| {
        format!(r#"{{"type":"Error","message":{:?}}}"#, e.to_string())
    })
}

/// Serialize a response for the UI.
pub fn encode(response: &EngineToUi) -> Result<String, BridgeError> {
    serde_json::to_string(response).map_err(|e| BridgeError::Serialization {
        reason: e.to_string(),
    })
}
