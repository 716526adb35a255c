//! Core error types for tomatick-core.
//!
//! The engine has almost no fallible operations by construction: phase
//! indices are generated internally via modulo arithmetic and are always in
//! range. The only engine-level error is `InvalidPhase`, rejecting a reset
//! to an index outside the cycle.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomatick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// `reset` was called with a phase index outside the 8-phase cycle.
    /// The call is rejected and session state is left unchanged.
    #[error("invalid phase index {phase} (the cycle has 8 phases)")]
    InvalidPhase { phase: usize },

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Config directory could not be created or resolved
    #[error("configuration directory unavailable: {0}")]
    DirUnavailable(String),

    /// Unknown configuration key
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
