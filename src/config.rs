//! Engine configuration
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! [limits]
//! max_channel = 32
//! max_mix = 16
//! min_db = -60.0
//! max_db = 10.0
//! ```

use crate::error::{MixerError, Result};
use crate::validation::ValidationLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: ValidationLimits,
}

impl EngineConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        for (name, value) in [
            ("max_channel", limits.max_channel),
            ("max_mix", limits.max_mix),
            ("max_matrix", limits.max_matrix),
            ("max_scene", limits.max_scene),
            ("max_dca", limits.max_dca),
        ] {
            if value == 0 {
                return Err(MixerError::Config(format!("{} must be at least 1", name)));
            }
        }
        if limits.min_db >= limits.max_db {
            return Err(MixerError::Config(format!(
                "min_db ({}) must be below max_db ({})",
                limits.min_db, limits.max_db
            )));
        }
        if limits.max_input_length == 0 {
            return Err(MixerError::Config(
                "max_input_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_limits_keep_other_defaults() {
        let config = EngineConfig::from_toml_str("[limits]\nmax_channel = 16\n").unwrap();
        assert_eq!(config.limits.max_channel, 16);
        assert_eq!(config.limits.max_mix, ValidationLimits::default().max_mix);
    }

    #[test]
    fn test_rejects_inverted_db_window() {
        let err = EngineConfig::from_toml_str("[limits]\nmin_db = 5.0\nmax_db = 0.0\n")
            .unwrap_err();
        assert!(matches!(err, MixerError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_limit() {
        let err = EngineConfig::from_toml_str("[limits]\nmax_dca = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_dca"));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = EngineConfig::from_toml_str("[limits\nmax_mix = 3").unwrap_err();
        assert!(matches!(err, MixerError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_scene = 50").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.limits.max_scene, 50);
    }
}
