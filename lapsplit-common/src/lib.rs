//! # LAP Split Common Library
//!
//! Shared code for the splitting cost workspace including:
//! - Spot primitive (features, squared distance, normalized feature difference)
//! - Track segments (ordered, identity-keyed spot sets)
//! - Splitting settings and TOML configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod spot;

pub use config::{LoggingConfig, SplittingSettings, TomlConfig};
pub use error::{Error, Result};
pub use spot::{Spot, SpotFeature, SpotId, TrackSegment};
