//! Editor settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for an [`EditorSession`](crate::session::EditorSession).
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Canvas size used when a template does not specify one.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Maximum number of history snapshots; `None` keeps every step.
    pub history_limit: Option<usize>,
    /// Width newly added images are scaled to.
    pub image_max_width: f64,
    /// Hit-test slack in canvas units.
    pub hit_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            history_limit: None,
            image_max_width: 300.0,
            hit_tolerance: 4.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let positive = |key: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    key,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        };
        positive("canvasWidth", self.canvas_width)?;
        positive("canvasHeight", self.canvas_height)?;
        positive("imageMaxWidth", self.image_max_width)?;
        if !self.hit_tolerance.is_finite() || self.hit_tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                key: "hitTolerance",
                reason: format!("must not be negative, got {}", self.hit_tolerance),
            });
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid {
                key: "historyLimit",
                reason: "must keep at least one snapshot".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"historyLimit": 50}"#).unwrap();
        assert_eq!(config.history_limit, Some(50));
        assert!((config.image_max_width - 300.0).abs() < f64::EPSILON);
        assert!((config.canvas_width - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EditorConfig {
            hit_tolerance: 2.0,
            ..EditorConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("hitTolerance"));
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"imageMaxWidth": 0}"#),
            Err(ConfigError::Invalid { key: "imageMaxWidth", .. })
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"historyLimit": 0}"#),
            Err(ConfigError::Invalid { key: "historyLimit", .. })
        ));
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(ConfigError::Serialization(_))
        ));
    }
}
