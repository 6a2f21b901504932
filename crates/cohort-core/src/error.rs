//! Error types for cohort synthesis and the session pipeline.

use cohort_model::{FilterError, SchemaError, SelectionError};
use thiserror::Error;

/// Errors from producing a cohort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// The synthesis capability returned a table of a different shape than
    /// the reference it was given.
    #[error(
        "synthesis returned {actual_rows} rows x [{actual_columns}], expected {expected_rows} rows x [{expected_columns}]"
    )]
    ShapeMismatch {
        expected_rows: usize,
        actual_rows: usize,
        expected_columns: String,
        actual_columns: String,
    },

    /// The synthesis capability itself failed.
    #[error("synthesis capability failed: {message}")]
    CapabilityFailure { message: String },

    /// A column's distribution could not be built or sampled.
    #[error("cannot draw values for '{column}': {message}")]
    Distribution { column: String, message: String },

    /// A cohort must have at least one row.
    #[error("row count must be positive, got {0}")]
    InvalidRowCount(usize),

    /// Failed DataFrame operation while assembling the cohort.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl SynthesisError {
    /// Capability failures may succeed on the next trigger; everything else
    /// points at a contract or input problem.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CapabilityFailure { .. })
    }
}

impl From<polars::prelude::PolarsError> for SynthesisError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Any error surfaced by the cohort pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CohortError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    /// Failed DataFrame operation outside synthesis.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
    /// No cohort has been synthesized yet.
    #[error("no cohort has been synthesized yet")]
    NoCohort,
}

impl From<polars::prelude::PolarsError> for CohortError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for cohort operations.
pub type Result<T> = std::result::Result<T, CohortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_capability_failures_are_retryable() {
        let failure = SynthesisError::CapabilityFailure {
            message: "fit diverged".to_string(),
        };
        assert!(failure.is_retryable());
        let mismatch = SynthesisError::ShapeMismatch {
            expected_rows: 100,
            actual_rows: 99,
            expected_columns: "Age".to_string(),
            actual_columns: "Age".to_string(),
        };
        assert!(!mismatch.is_retryable());
    }

    #[test]
    fn error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Age".into());
        let err: CohortError = polars_err.into();
        assert!(matches!(err, CohortError::DataFrame { .. }));
    }

    #[test]
    fn schema_error_display_passes_through() {
        let err: CohortError = SchemaError::NotFound("Weight".to_string()).into();
        assert_eq!(err.to_string(), "column 'Weight' not found");
    }
}
