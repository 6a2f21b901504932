//! Session configuration options.

use cohort_model::ColorPolicy;
use serde::{Deserialize, Serialize};

/// Inclusive bounds applied to requested row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowCountBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for RowCountBounds {
    fn default() -> Self {
        Self { min: 100, max: 10_000 }
    }
}

impl RowCountBounds {
    /// Clamp a requested row count. Negative requests land on `min`.
    ///
    /// Bounds given in the wrong order are swapped first.
    pub fn clamp(&self, requested: i64) -> usize {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        let requested = usize::try_from(requested).unwrap_or(0);
        requested.clamp(low.max(1), high.max(1))
    }
}

/// Options controlling a cohort session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Bounds for row-count changes.
    pub row_bounds: RowCountBounds,

    /// Row count of the first synthesis, clamped into `row_bounds`.
    pub initial_rows: usize,

    /// Fixed RNG seed. Fresh entropy when unset.
    pub seed: Option<u64>,

    /// Handling of a color variable on plots that cannot use one.
    pub color_policy: ColorPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            row_bounds: RowCountBounds::default(),
            initial_rows: 1_000,
            seed: None,
            color_policy: ColorPolicy::Ignore,
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_rows(mut self, rows: usize) -> Self {
        self.initial_rows = rows;
        self
    }

    pub fn with_color_policy(mut self, policy: ColorPolicy) -> Self {
        self.color_policy = policy;
        self
    }

    /// `initial_rows` after clamping.
    pub fn initial_row_count(&self) -> usize {
        self.row_bounds
            .clamp(i64::try_from(self.initial_rows).unwrap_or(i64::MAX))
    }
}
