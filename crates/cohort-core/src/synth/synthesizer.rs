use std::collections::BTreeSet;

use cohort_model::Schema;
use polars::prelude::DataFrame;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::error::SynthesisError;
use crate::frame::Cohort;
use crate::synth::capability::SynthesisCapability;
use crate::synth::reference::{ReferenceDistribution, generate_column, reference_table};

/// Produces cohorts consistent with a schema.
///
/// Fixed columns are drawn from their reference distributions and passed
/// through the synthesis capability; custom columns are drawn uniformly
/// afterwards and appended in schema order.
pub struct CohortSynthesizer {
    capability: Box<dyn SynthesisCapability>,
    rng: StdRng,
}

impl std::fmt::Debug for CohortSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohortSynthesizer")
            .field("capability", &self.capability.name())
            .finish_non_exhaustive()
    }
}

impl CohortSynthesizer {
    /// Synthesizer seeded from OS entropy.
    pub fn new(capability: Box<dyn SynthesisCapability>) -> Self {
        Self {
            capability,
            rng: StdRng::from_entropy(),
        }
    }

    /// Synthesizer with a fixed seed, for reproducible runs.
    pub fn with_seed(capability: Box<dyn SynthesisCapability>, seed: u64) -> Self {
        Self {
            capability,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn capability_name(&self) -> &str {
        self.capability.name()
    }

    /// Draw a cohort of `row_count` rows with a value for every schema column.
    ///
    /// # Errors
    ///
    /// - [`SynthesisError::InvalidRowCount`] when `row_count` is zero
    /// - [`SynthesisError::CapabilityFailure`] when the capability fails
    /// - [`SynthesisError::ShapeMismatch`] when the capability returns a
    ///   table with a different row count or column set
    pub fn synthesize(&mut self, schema: &Schema, row_count: usize) -> Result<Cohort, SynthesisError> {
        if row_count == 0 {
            return Err(SynthesisError::InvalidRowCount(row_count));
        }

        let reference = reference_table(schema.fixed(), row_count, &mut self.rng)?;
        debug!(
            rows = reference.height(),
            columns = reference.width(),
            "drew reference sample"
        );

        let sampled = self
            .capability
            .fit_and_sample(&reference, &mut self.rng)
            .map_err(|err| SynthesisError::CapabilityFailure {
                message: format!("{err:#}"),
            })?;
        check_shape(&reference, &sampled)?;

        let fixed_names: Vec<String> = schema.fixed().iter().map(|c| c.name.clone()).collect();
        let mut data = sampled.select(fixed_names)?;

        for definition in schema.custom() {
            let column = generate_column(
                definition,
                ReferenceDistribution::Uniform,
                row_count,
                &mut self.rng,
            )?;
            data.with_column(column)?;
        }

        info!(
            rows = data.height(),
            columns = data.width(),
            capability = self.capability.name(),
            "synthesized cohort"
        );
        Ok(Cohort::new(data))
    }
}

fn column_set(df: &DataFrame) -> BTreeSet<String> {
    df.get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

fn check_shape(reference: &DataFrame, sampled: &DataFrame) -> Result<(), SynthesisError> {
    let expected = column_set(reference);
    let actual = column_set(sampled);
    if reference.height() == sampled.height() && expected == actual {
        return Ok(());
    }
    Err(SynthesisError::ShapeMismatch {
        expected_rows: reference.height(),
        actual_rows: sampled.height(),
        expected_columns: expected.into_iter().collect::<Vec<_>>().join(", "),
        actual_columns: actual.into_iter().collect::<Vec<_>>().join(", "),
    })
}
