//! Error types for the mixspeak engine
//!
//! Translation itself is best-effort and never fails outward: an utterance
//! that cannot be interpreted simply yields no commands. The errors here cover
//! the two places where something is genuinely wrong - a rule table whose
//! resolver asks for a capture group its pattern does not define, and
//! configuration loading.

use thiserror::Error;

/// Result type for mixspeak operations
pub type Result<T> = std::result::Result<T, MixerError>;

#[derive(Error, Debug)]
pub enum MixerError {
    /// A rule fired but its pattern lacks a capture group the resolver needs
    #[error("rule '{rule}' has no capture group '{group}'")]
    MissingCapture { rule: String, group: String },

    /// Configuration values are inconsistent or unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid TOML for `EngineConfig`
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
