//! Splitting cost matrix
//!
//! Rows are middle spots, columns are track segments, both in input order.
//! Each cell is either a finite cost or a blocked pair; the numeric blocking
//! value is only substituted when the matrix is read as numbers, which is the
//! form the linear assignment solver consumes.

use crate::error::{Error, Result};
use lapsplit_common::SpotFeature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a pair was blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// Splitting is disabled in the settings
    SplittingDisabled,
    /// The middle spot belongs to the track segment
    SameSpot,
    /// Frame gap is zero, negative or above the time cutoff
    Time,
    /// Distance above the maximum distance
    Distance,
    /// Normalized feature difference above its cutoff
    Feature(SpotFeature),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::SplittingDisabled => f.write_str("splitting disabled"),
            BlockReason::SameSpot => f.write_str("same spot"),
            BlockReason::Time => f.write_str("time gate"),
            BlockReason::Distance => f.write_str("distance gate"),
            BlockReason::Feature(feature) => write!(f, "{} cutoff", feature),
        }
    }
}

/// One matrix cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitCost {
    Cost(f64),
    Blocked(BlockReason),
}

impl SplitCost {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SplitCost::Blocked(_))
    }

    pub fn cost(&self) -> Option<f64> {
        match self {
            SplitCost::Cost(c) => Some(*c),
            SplitCost::Blocked(_) => None,
        }
    }

    /// Numeric value with `blocking_value` standing in for blocked pairs
    pub fn value(&self, blocking_value: f64) -> f64 {
        self.cost().unwrap_or(blocking_value)
    }
}

/// Dense middle-spot x track-segment cost matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    blocking_value: f64,
    cells: Vec<SplitCost>,
}

impl CostMatrix {
    /// Matrix with every cell blocked for the same reason
    pub fn filled(rows: usize, cols: usize, blocking_value: f64, reason: BlockReason) -> Self {
        Self {
            rows,
            cols,
            blocking_value,
            cells: vec![SplitCost::Blocked(reason); rows * cols],
        }
    }

    /// Assemble a matrix from complete rows
    pub fn from_rows(cols: usize, blocking_value: f64, rows: Vec<Vec<SplitCost>>) -> Result<Self> {
        let n_rows = rows.len();
        let mut cells = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::Internal(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            blocking_value,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn blocking_value(&self) -> f64 {
        self.blocking_value
    }

    /// Cell at row `i` (middle spot), column `j` (track segment)
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn cell(&self, i: usize, j: usize) -> &SplitCost {
        assert!(
            i < self.rows && j < self.cols,
            "cell ({}, {}) out of range for {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        &self.cells[i * self.cols + j]
    }

    /// Numeric value at `(i, j)`, blocked pairs reading as the blocking value
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.cell(i, j).value(self.blocking_value)
    }

    /// Cells of row `i`, one per track segment
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[SplitCost] {
        assert!(
            i < self.rows,
            "row {} out of range for {}x{} matrix",
            i,
            self.rows,
            self.cols
        );
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    pub fn cells(&self) -> impl Iterator<Item = &SplitCost> {
        self.cells.iter()
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_blocked()).count()
    }

    /// Numeric rows for the assignment solver
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|i| {
                self.row(i)
                    .iter()
                    .map(|c| c.value(self.blocking_value))
                    .collect()
            })
            .collect()
    }

    pub fn to_dense_matrix(&self) -> DenseMatrix {
        DenseMatrix {
            rows: self.rows,
            cols: self.cols,
            blocking_value: self.blocking_value,
            values: self.to_dense(),
        }
    }
}

/// Serialized numeric form of a [`CostMatrix`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    pub rows: usize,
    pub cols: usize,
    pub blocking_value: f64,
    pub values: Vec<Vec<f64>>,
}
