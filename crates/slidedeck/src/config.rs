use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::input::{is_valid_fullscreen_key, is_valid_swipe_threshold};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidedeck";

pub const KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.start_mode",
    "input.swipe_threshold",
    "input.wheel_debounce_ms",
    "input.fullscreen_key",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// `windowed` or `fullscreen`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Minimum horizontal travel, in pixels, for a swipe to navigate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheel_debounce_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullscreen_key: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `slidedeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidedeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn starts_fullscreen(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.start_mode.as_deref())
            .is_some_and(|m| m == "fullscreen")
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_mode" => {
                match value {
                    "windowed" | "fullscreen" => {}
                    _ => anyhow::bail!(
                        "Invalid start_mode: {value}. Must be 'windowed' or 'fullscreen'."
                    ),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_mode = Some(value.to_string());
            }
            "input.swipe_threshold" => {
                let threshold: f32 = value
                    .parse()
                    .ok()
                    .filter(|t: &f32| is_valid_swipe_threshold(*t))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid swipe_threshold: {value}. Must be a positive number of pixels."
                        )
                    })?;
                self.input
                    .get_or_insert_with(InputConfig::default)
                    .swipe_threshold = Some(threshold);
            }
            "input.wheel_debounce_ms" => {
                let Ok(ms) = value.parse::<u64>() else {
                    anyhow::bail!(
                        "Invalid wheel_debounce_ms: {value}. Must be a whole number of milliseconds."
                    );
                };
                self.input
                    .get_or_insert_with(InputConfig::default)
                    .wheel_debounce_ms = Some(ms);
            }
            "input.fullscreen_key" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if is_valid_fullscreen_key(c) => {}
                    (Some(c), None) if c.is_ascii_alphabetic() => anyhow::bail!(
                        "Invalid fullscreen_key: {value}. Q, D and H are already bound."
                    ),
                    _ => anyhow::bail!(
                        "Invalid fullscreen_key: {value}. Must be a single letter."
                    ),
                }
                self.input
                    .get_or_insert_with(InputConfig::default)
                    .fullscreen_key = Some(value.to_ascii_lowercase());
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: {}",
                KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.start_mode", "fullscreen").unwrap();
        config.set("input.swipe_threshold", "75").unwrap();
        config.set("input.wheel_debounce_ms", "120").unwrap();
        config.set("input.fullscreen_key", "P").unwrap();

        assert_eq!(config.theme(), Some("dark"));
        assert!(config.starts_fullscreen());
        let input = config.input.as_ref().unwrap();
        assert_eq!(input.swipe_threshold, Some(75.0));
        assert_eq!(input.wheel_debounce_ms, Some(120));
        assert_eq!(input.fullscreen_key.as_deref(), Some("p"));
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.start_mode", "overview").is_err());
        assert!(config.set("input.swipe_threshold", "-3").is_err());
        assert!(config.set("input.swipe_threshold", "wide").is_err());
        assert!(config.set("input.wheel_debounce_ms", "1.5").is_err());
        assert!(config.set("input.fullscreen_key", "fx").is_err());
        assert!(config.set("input.fullscreen_key", "1").is_err());
        assert!(config.set("input.fullscreen_key", "q").is_err());
        assert!(config.set("input.fullscreen_key", "D").is_err());
        assert!(config.set("input.fullscreen_key", "h").is_err());
        assert!(config.set("nope", "x").is_err());
        assert!(config.defaults.is_none());
        assert!(config.input.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("slidedeck-config-{}", std::process::id()));
        let path = dir.join(FILENAME);
        let mut config = Config::default();
        config.set("input.wheel_debounce_ms", "80").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.input.unwrap().wheel_debounce_ms, Some(80));
        assert!(loaded.defaults.is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_error() {
        let err = Config::load_from(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }

    #[test]
    fn test_empty_sections_not_serialized() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(!yaml.contains("defaults"));
        assert!(!yaml.contains("input"));
    }
}
