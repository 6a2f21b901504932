use thiserror::Error;

/// Errors from schema mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column '{0}' already exists")]
    DuplicateName(String),
    #[error("invalid definition for column '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },
    #[error("column '{0}' not found")]
    NotFound(String),
    #[error("column '{0}' is part of the fixed schema and cannot be removed")]
    FixedColumn(String),
}

impl SchemaError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors from resolving a plot selection against the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("{plot} plot requires a {variable} variable")]
    MissingRequiredVariable {
        plot: &'static str,
        variable: &'static str,
    },
    #[error("{plot} plot does not support a color variable ('{column}')")]
    InapplicableColorVariable { plot: &'static str, column: String },
}

/// Errors from defining a per-column filter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("filter for '{column}' expects a {expected} value")]
    KindMismatch {
        column: String,
        expected: &'static str,
    },
    #[error("range filter for '{column}' has low {low} above high {high}")]
    InvertedRange { column: String, low: f64, high: f64 },
    #[error("range filter for '{column}' [{low}, {high}] exceeds column range [{min}, {max}]")]
    OutOfRange {
        column: String,
        low: f64,
        high: f64,
        min: f64,
        max: f64,
    },
    #[error("'{category}' is not a category of '{column}'")]
    UnknownCategory { column: String, category: String },
}
