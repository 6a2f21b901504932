//! Data definitions for synthetic cohort exploration.
//!
//! - **column**: column kinds, definitions and the fixed health columns
//! - **schema**: ordered fixed + custom column set
//! - **filter**: per-column range and category predicates
//! - **registry**: schema owner enforcing uniqueness and filter defaults
//! - **selection**: plot type and variable bindings

pub mod column;
pub mod error;
pub mod filter;
pub mod registry;
pub mod schema;
pub mod selection;

pub use column::{ColumnDefinition, ColumnKind, DIABETES_RISK_LEVELS, FixedColumn, SMOKING_STATUSES};
pub use error::{FilterError, SchemaError, SelectionError};
pub use filter::{FilterState, FilterValue};
pub use registry::SchemaRegistry;
pub use schema::Schema;
pub use selection::{ColorPolicy, Encodings, PlotType, Selection, SelectionUpdate};
