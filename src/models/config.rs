//! Application configuration.
//!
//! Read once at startup from the JSON file named by `ATTACK_OVERLAY_CONFIG`.
//! Missing keys fall back to defaults; a missing or unreadable file means
//! all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::OverlaySettings;

pub const CONFIG_ENV: &str = "ATTACK_OVERLAY_CONFIG";
pub const ENGINE_ENV: &str = "ATTACK_OVERLAY_ENGINE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Executable started as the opponent
    pub path: PathBuf,
    /// Value for the engine's "Skill Level" option
    pub skill_level: u8,
    /// Search time per move
    pub think_time_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            skill_level: 5,
            think_time_ms: 500,
        }
    }
}

/// Short pauses so moves don't land faster than the eye can follow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PacingConfig {
    pub engine_request_delay_ms: u64,
    pub input_enable_delay_ms: u64,
}

impl PacingConfig {
    pub fn engine_request_delay(&self) -> Duration {
        Duration::from_millis(self.engine_request_delay_ms)
    }

    pub fn input_enable_delay(&self) -> Duration {
        Duration::from_millis(self.input_enable_delay_ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            engine_request_delay_ms: 250,
            input_enable_delay_ms: 250,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub pacing: PacingConfig,
    pub overlay: OverlaySettings,
}

impl AppConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid configuration")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Configuration from the environment; never fails
    pub fn load() -> Self {
        let file = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let engine = std::env::var_os(ENGINE_ENV).map(PathBuf::from);
        Self::resolve(file.as_deref(), engine)
    }

    fn resolve(file: Option<&Path>, engine_override: Option<PathBuf>) -> Self {
        let mut config = match file {
            Some(path) => match Self::from_file(path) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!("using default configuration: {e:#}");
                    Self::default()
                }
            },
            None => Self::default(),
        };
        if let Some(path) = engine_override {
            config.engine.path = path;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OverlayStyle, SideFilter};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.engine.path, PathBuf::from("stockfish"));
        assert_eq!(config.engine.skill_level, 5);
        assert_eq!(config.engine.think_time_ms, 500);
        assert_eq!(config.pacing.engine_request_delay(), Duration::from_millis(250));
        assert_eq!(config.overlay, OverlaySettings::default());
    }

    #[test]
    fn test_partial_json() {
        let config = AppConfig::from_json(
            r#"{
                "engine": { "skill_level": 12 },
                "overlay": { "style": "arrows", "side": "white" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.engine.skill_level, 12);
        assert_eq!(config.engine.think_time_ms, 500);
        assert_eq!(config.pacing, PacingConfig::default());
        assert_eq!(config.overlay.style, OverlayStyle::Arrows);
        assert_eq!(config.overlay.side, SideFilter::White);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AppConfig::from_json(r#"{"engine": {"skill_level": "high"}}"#).is_err());
        assert!(AppConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("attack-overlay-missing-config.json");
        let config = AppConfig::resolve(Some(&path), None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_and_engine_override() {
        let path = std::env::temp_dir().join(format!(
            "attack-overlay-config-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"engine": {"path": "/opt/engine"}, "pacing": {"input_enable_delay_ms": 0}}"#,
        )
        .unwrap();

        let config = AppConfig::resolve(Some(&path), None);
        assert_eq!(config.engine.path, PathBuf::from("/opt/engine"));
        assert_eq!(config.pacing.input_enable_delay(), Duration::ZERO);

        let config = AppConfig::resolve(Some(&path), Some(PathBuf::from("/usr/bin/other")));
        assert_eq!(config.engine.path, PathBuf::from("/usr/bin/other"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_schema_lists_sections() {
        let schema = serde_json::to_value(schemars::schema_for!(AppConfig)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("engine"));
        assert!(properties.contains_key("pacing"));
        assert!(properties.contains_key("overlay"));
    }
}
