//! Cohort export library.
//!
//! This crate turns session output into renderer- and file-facing formats:
//!
//! - **Vega-Lite**: v6 JSON specifications for a [`PlotSpec`](cohort_core::PlotSpec)
//! - **CSV**: the cohort table with a header row
//! - **Records**: row-oriented JSON objects, shared by the other writers

mod common;
mod csv;
mod records;
mod vegalite;

pub use common::ensure_parent_dir;
pub use csv::{cohort_to_csv_string, write_cohort_csv};
pub use records::{cohort_records, field_type};
pub use vegalite::{VEGA_LITE_SCHEMA, VegaLiteWriter};
