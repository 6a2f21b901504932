//! Cohort synthesis and exploration pipeline.
//!
//! This crate provides the behavior over polars frames:
//!
//! - **frame**: the immutable [`Cohort`] table and per-column summaries
//! - **synth**: reference distributions, the synthesis capability seam and
//!   the schema-driven synthesizer
//! - **filter**: stable, fail-open row filtering
//! - **plot**: selection resolution into a [`PlotSpec`]
//! - **options**: session configuration and row-count bounds
//! - **session**: the trigger-driven orchestrator

pub mod error;
pub mod filter;
pub mod frame;
pub mod options;
pub mod plot;
pub mod session;
pub mod synth;

pub use error::{CohortError, Result, SynthesisError};
pub use filter::apply_filters;
pub use frame::{CellValue, Cohort, ColumnSummary};
pub use options::{RowCountBounds, SessionOptions};
pub use plot::{PlotSpec, resolve};
pub use session::{NoticeKind, Session, SessionNotice, Trigger};
pub use synth::{
    CohortSynthesizer, IdentitySampler, MarginalBootstrap, ReferenceDistribution,
    SynthesisCapability,
};
