//! Error types for the Wox query box.

use std::path::PathBuf;
use thiserror::Error;

/// Query channel errors.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The other end of the channel went away.
    #[error("Channel closed")]
    Closed,

    /// An incoming message could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An outgoing message could not be encoded.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The producer answered with a failure.
    #[error("Remote '{method}' failed: {message}")]
    Remote { method: String, message: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error reading {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    /// Parse error.
    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
