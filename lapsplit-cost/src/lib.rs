//! # LAP Splitting Cost (lapsplit-cost)
//!
//! Splitting cost matrix for the LAP tracker.
//!
//! **Purpose:** Score every (middle spot, track segment) pair as a candidate
//! split event, so that a linear assignment solver can decide which track
//! segments start by splitting off from an existing spot.
//!
//! **Architecture:** gate tests ([`gate`]) decide whether a pair may carry a
//! cost, the cost formula ([`formula`]) scores passing pairs, and the builder
//! ([`splitting`]) spreads matrix rows over a fork-join [`pool`].

pub mod error;
pub mod formula;
pub mod gate;
pub mod matrix;
pub mod pool;
pub mod problem;
pub mod splitting;

pub use error::{Error, Result};
pub use matrix::{BlockReason, CostMatrix, DenseMatrix, SplitCost};
pub use pool::WorkerPool;
pub use splitting::SplittingCostFunction;
