//! Common error types for LAP splitting

use crate::spot::{SpotFeature, SpotId};
use thiserror::Error;

/// Common result type for LAP splitting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the splitting crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A spot lacks a feature the caller asked for
    #[error("Spot {spot} has no value for feature {feature}")]
    MissingFeature { spot: SpotId, feature: SpotFeature },

    /// A numeric value is NaN or outside its defined domain
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
