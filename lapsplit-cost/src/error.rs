//! Error types for lapsplit-cost
//!
//! Every failure aborts the whole build: a cost matrix with a silently wrong
//! cell is worse than no matrix for the assignment solver downstream.

use thiserror::Error;

/// Main error type for the splitting cost builder
#[derive(Error, Debug)]
pub enum Error {
    /// Spot, feature or configuration error from the common crate
    #[error(transparent)]
    Common(#[from] lapsplit_common::Error),

    /// A track segment has no spots, so it has no start
    #[error("Track segment {index} is empty")]
    EmptyTrackSegment { index: usize },

    /// A single segment passed outside a build has no spots
    #[error("Track segment is empty")]
    EmptySegment,

    /// NaN or out-of-domain time or distance value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Failure while computing one matrix row
    #[error("Failed to compute costs for middle spot {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<Error>,
    },

    /// Problem file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Problem file references unknown or duplicate spots
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Thread creation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker thread panicked
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    /// Broken internal invariant (row written twice or never written)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the lapsplit-cost Error
pub type Result<T> = std::result::Result<T, Error>;
