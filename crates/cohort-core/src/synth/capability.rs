//! The fit-and-sample capability that turns a reference sample into a
//! synthetic table.
//!
//! Implementations must return a table with the same row count and column
//! set as the reference; the synthesizer checks this contract and rejects
//! anything else as a shape mismatch.

use anyhow::{Result, bail};
use polars::prelude::{Column, DataFrame, DataType};
use rand::{Rng, RngCore};

/// Black-box synthesis step: fit a model to `reference` and sample a
/// same-shaped synthetic table from it.
pub trait SynthesisCapability: Send + Sync {
    /// Produce the synthetic table.
    fn fit_and_sample(&self, reference: &DataFrame, rng: &mut dyn RngCore) -> Result<DataFrame>;

    /// Human-readable name (for logging).
    fn name(&self) -> &str;
}

/// Returns the reference unchanged. Keeps pipeline tests deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySampler;

impl SynthesisCapability for IdentitySampler {
    fn fit_and_sample(&self, reference: &DataFrame, _rng: &mut dyn RngCore) -> Result<DataFrame> {
        Ok(reference.clone())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Resamples every column independently with replacement.
///
/// Marginal distributions are preserved while the link between values of
/// the same reference row is broken, so no synthetic row reproduces a
/// reference row except by chance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarginalBootstrap;

impl SynthesisCapability for MarginalBootstrap {
    fn fit_and_sample(&self, reference: &DataFrame, rng: &mut dyn RngCore) -> Result<DataFrame> {
        let height = reference.height();
        if height == 0 {
            return Ok(reference.clone());
        }
        let mut columns = Vec::with_capacity(reference.width());
        for column in reference.get_columns() {
            let indices: Vec<usize> = (0..height).map(|_| rng.gen_range(0..height)).collect();
            let resampled = match column.dtype() {
                DataType::Float64 => {
                    let values: Vec<Option<f64>> = column.f64()?.into_iter().collect();
                    let sampled: Vec<Option<f64>> = indices.iter().map(|&i| values[i]).collect();
                    Column::new(column.name().clone(), sampled)
                }
                DataType::String => {
                    let values: Vec<Option<&str>> = column.str()?.into_iter().collect();
                    let sampled: Vec<Option<&str>> = indices.iter().map(|&i| values[i]).collect();
                    Column::new(column.name().clone(), sampled)
                }
                other => bail!(
                    "marginal bootstrap cannot resample column '{}' of type {other}",
                    column.name()
                ),
            };
            columns.push(resampled);
        }
        Ok(DataFrame::new(columns)?)
    }

    fn name(&self) -> &str {
        "marginal-bootstrap"
    }
}
