//! Session configuration

use std::path::Path;

use postura_core::{PosturaError, PosturaResult};
use postura_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Runtime session configuration
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    /// Frames buffered between the pose source and the engine
    pub frame_buffer: usize,
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            engine: EngineConfig::default(),
            frame_buffer: 64,
            log_format: LogFormat::Pretty,
            log_filter: "info".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> PosturaResult<Self> {
        let config: SessionConfig =
            serde_json::from_str(s).map_err(|e| PosturaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> PosturaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> PosturaResult<()> {
        if self.frame_buffer == 0 {
            return Err(PosturaError::Config("frame_buffer must be non-zero".into()));
        }
        self.engine.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postura_engine::AutoHidePolicy;
    use std::time::Duration;

    #[test]
    fn test_empty_json_is_default() {
        let config = SessionConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_nested_engine_overrides() {
        let config = SessionConfig::from_json_str(
            r#"{
                "log_format": "json",
                "engine": {
                    "thresholds": { "good": 170.0, "warning": 155.0 },
                    "auto_hide_policy": "at_or_below_warning",
                    "warning_duration_ms": 8000
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.engine.thresholds.good, 170.0);
        assert_eq!(config.engine.thresholds.perfect, 180.0);
        assert_eq!(config.engine.warning_duration, Duration::from_secs(8));
        assert_eq!(config.engine.auto_hide_policy, AutoHidePolicy::AtOrBelowWarning);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "frame_buffer": 0 }"#),
            Err(PosturaError::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "engine": { "thresholds": { "good": 150.0 } } }"#),
            Err(PosturaError::InvalidThresholds { .. })
        ));
        assert!(matches!(
            SessionConfig::from_json_str("not json"),
            Err(PosturaError::Config(_))
        ));
    }
}
