//! Row filtering against the schema's filter state.
//!
//! A row is kept when every schema column accepts its value. Columns with
//! no filter entry, and schema columns the cohort does not carry, accept
//! every row. Row order is preserved and an empty result is valid.

use cohort_model::{ColumnKind, FilterState, Schema};
use polars::prelude::{BooleanChunked, NewChunkedArray};
use tracing::debug;

use crate::error::Result;
use crate::frame::Cohort;

/// Reduce `cohort` to the rows matching `filters`. The input is not modified.
///
/// # Errors
///
/// Fails when a column's dtype does not match its schema kind.
pub fn apply_filters(cohort: &Cohort, schema: &Schema, filters: &FilterState) -> Result<Cohort> {
    let height = cohort.row_count();
    let mut keep = vec![true; height];

    for definition in schema.columns() {
        let Some(filter) = filters.get(&definition.name) else {
            continue;
        };
        if !cohort.has_column(&definition.name) {
            continue;
        }
        match &definition.kind {
            ColumnKind::Numeric { .. } => {
                let values = cohort.numeric_values(&definition.name)?;
                for (flag, value) in keep.iter_mut().zip(values) {
                    *flag = *flag && value.is_some_and(|v| filter.matches_number(v));
                }
            }
            ColumnKind::Categorical { .. } => {
                let values = cohort.category_values(&definition.name)?;
                for (flag, value) in keep.iter_mut().zip(values) {
                    *flag = *flag && value.is_some_and(|v| filter.matches_category(&v));
                }
            }
        }
    }

    let kept = keep.iter().filter(|flag| **flag).count();
    debug!(rows = height, kept, "applied filters");
    if kept == height {
        return Ok(cohort.clone());
    }
    let mask = BooleanChunked::from_slice("filter".into(), &keep);
    Ok(Cohort::new(cohort.data().filter(&mask)?))
}
