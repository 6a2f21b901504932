//! Cohort synthesis.
//!
//! - **capability**: the fit-and-sample seam plus the built-in samplers
//! - **reference**: fixed-column reference distributions and value generators
//! - **synthesizer**: assembles a schema-consistent cohort

pub mod capability;
pub mod reference;
pub mod synthesizer;

pub use capability::{IdentitySampler, MarginalBootstrap, SynthesisCapability};
pub use reference::ReferenceDistribution;
pub use synthesizer::CohortSynthesizer;
