//! Errors surfaced by the conversion crate.
//!
//! `convert()` itself never fails; these only come from option loading and
//! serialization.

use thiserror::Error;

/// Failure outside the conversion pipeline proper.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Serializing or deserializing JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading an input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An option was given a value outside its accepted set.
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption {
        /// Option name, as spelled in JSON.
        name: String,
        /// Rejected value.
        value: String,
    },
}
