use structure_engine::{Engine, EngineConfig, StructureError};

use crate::edit_state::EditState;

/// The engine state wrapper for the bridge.
///
/// Holds the structural engine and the editing selection of the menus.
#[derive(Debug)]
pub struct EngineState {
    pub engine: Engine,
    pub edit: EditState,
}

impl EngineState {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: Engine::with_config(config),
            edit: EditState::default(),
        }
    }

    /// Parse a JSON configuration and start an engine from it.
    pub fn from_config_json(json: &str) -> Result<Self, BridgeError> {
        let config = EngineConfig::from_json(json).map_err(|e| BridgeError::Config {
            reason: e.to_string(),
        })?;
        Ok(Self::with_config(config))
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from the bridge layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("{operation} needs a selection")]
    EmptySelection { operation: &'static str },

    #[error("engine error: {0}")]
    Engine(#[from] StructureError),

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
