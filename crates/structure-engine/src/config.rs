//! Engine configuration.

use serde::{Deserialize, Serialize};
use shelf_types::FeetType;

use crate::columns::MAX_LENGTH_CM;
use crate::pricing::PriceTable;
use crate::types::GlobalDimensions;

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration controlling the initial structure and engine behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dimensions of a fresh structure. The width is recomputed from the
    /// column widths on start.
    pub dimensions: GlobalDimensions,
    pub feet: FeetType,
    /// Number of committed states kept for undo.
    pub history_limit: usize,
    /// When set, applying a column width bumps the global width by this
    /// fixed amount instead of recomputing it from the columns.
    pub legacy_width_increment: Option<f64>,
    pub prices: PriceTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimensions: GlobalDimensions::default(),
            feet: FeetType::None,
            history_limit: 50,
            legacy_width_increment: None,
            prices: PriceTable::default(),
        }
    }
}

impl EngineConfig {
    /// Reproduces the historical width edit, which added 12 cm to the
    /// global width on every apply.
    pub fn legacy() -> Self {
        Self {
            legacy_width_increment: Some(12.0),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dimensions;
        let positive = [
            ("dimensions.height", d.height),
            ("dimensions.depth", d.depth),
            ("dimensions.thickness", d.thickness),
            ("dimensions.cell_width", d.cell_width),
            ("dimensions.cell_height", d.cell_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0 && value <= MAX_LENGTH_CM) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be in (0, {}], got {}", MAX_LENGTH_CM, value),
                });
            }
        }
        if d.columns == 0 {
            return Err(ConfigError::Invalid {
                field: "dimensions.columns",
                reason: "at least one column is required".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            EngineConfig::from_json(r#"{ "dimensions": { "columns": 5 }, "feet": "legs" }"#)
                .unwrap();
        assert_eq!(config.dimensions.columns, 5);
        assert_eq!(config.dimensions.thickness, 2.0);
        assert_eq!(config.feet, FeetType::Legs);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_json(r#"{ "dimensions": { "thickness": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "dimensions.thickness",
                ..
            }
        ));
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "dimensions": { "height": 1e12 } }"#),
            Err(ConfigError::Invalid {
                field: "dimensions.height",
                ..
            })
        ));
    }
}
