//! Reference distributions for the fixed columns and value generators for
//! custom columns.
//!
//! | Column        | Distribution                         | Precision |
//! |---------------|--------------------------------------|-----------|
//! | Age           | N(50, 15) truncated to [0, 100]      | integer   |
//! | BMI           | N(25, 5) truncated to [15, 40]       | 0.1       |
//! | BloodPressure | N(120, 15) truncated to [80, 180]    | integer   |
//! | A1C           | N(6, 1) truncated to [4, 14]         | 0.1       |
//! | Cholesterol   | N(200, 40) truncated to [100, 300]   | integer   |
//! | SmokingStatus | uniform over the three statuses      |           |
//! | DiabetesRisk  | uniform over "0" / "1"               |           |
//!
//! Truncation bounds and precision come from the column definitions; only
//! the location and scale live here.

use cohort_model::{ColumnDefinition, ColumnKind, FixedColumn};
use polars::prelude::{Column, DataFrame};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::SynthesisError;

/// Rejection attempts before a truncated-normal draw falls back to clamping.
const MAX_REJECTIONS: usize = 1_000;

/// How values of a column are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceDistribution {
    /// Normal with the given location and scale, truncated to the column range.
    TruncatedNormal { mean: f64, sd: f64 },
    /// Uniform over the column range or its categories.
    Uniform,
}

impl ReferenceDistribution {
    /// Distribution used for a fixed column's reference sample.
    pub fn for_fixed(column: FixedColumn) -> Self {
        match column {
            FixedColumn::Age => Self::TruncatedNormal {
                mean: 50.0,
                sd: 15.0,
            },
            FixedColumn::Bmi => Self::TruncatedNormal { mean: 25.0, sd: 5.0 },
            FixedColumn::BloodPressure => Self::TruncatedNormal {
                mean: 120.0,
                sd: 15.0,
            },
            FixedColumn::A1c => Self::TruncatedNormal { mean: 6.0, sd: 1.0 },
            FixedColumn::Cholesterol => Self::TruncatedNormal {
                mean: 200.0,
                sd: 40.0,
            },
            FixedColumn::SmokingStatus | FixedColumn::DiabetesRisk => Self::Uniform,
        }
    }
}

/// Round to `decimals` places, keeping the result inside `[min, max]`.
pub fn round_to(value: f64, decimals: u32, min: f64, max: f64) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    ((value * scale).round() / scale).clamp(min, max)
}

/// One draw from N(mean, sd) truncated to `[low, high]`.
fn truncated_normal<R: Rng + ?Sized>(
    normal: &Normal<f64>,
    low: f64,
    high: f64,
    rng: &mut R,
) -> f64 {
    for _ in 0..MAX_REJECTIONS {
        let value = normal.sample(rng);
        if (low..=high).contains(&value) {
            return value;
        }
    }
    normal.sample(rng).clamp(low, high)
}

/// Generate `rows` values for a column as a Polars column.
///
/// Numeric columns are `Float64`, categorical columns are `String`.
///
/// # Errors
///
/// Fails when the distribution parameters are invalid or a categorical
/// column has no categories.
pub fn generate_column<R: Rng + ?Sized>(
    definition: &ColumnDefinition,
    distribution: ReferenceDistribution,
    rows: usize,
    rng: &mut R,
) -> Result<Column, SynthesisError> {
    let name = definition.name.as_str();
    match (&definition.kind, distribution) {
        (
            ColumnKind::Numeric { min, max, decimals },
            ReferenceDistribution::TruncatedNormal { mean, sd },
        ) => {
            let normal = Normal::new(mean, sd).map_err(|err| SynthesisError::Distribution {
                column: name.to_string(),
                message: err.to_string(),
            })?;
            let values: Vec<f64> = (0..rows)
                .map(|_| {
                    let value = truncated_normal(&normal, *min, *max, &mut *rng);
                    match decimals {
                        Some(places) => round_to(value, *places, *min, *max),
                        None => value,
                    }
                })
                .collect();
            Ok(Column::new(name.into(), values))
        }
        (ColumnKind::Numeric { min, max, decimals }, ReferenceDistribution::Uniform) => {
            let values: Vec<f64> = (0..rows)
                .map(|_| {
                    let value = rng.gen_range(*min..=*max);
                    match decimals {
                        Some(places) => round_to(value, *places, *min, *max),
                        None => value,
                    }
                })
                .collect();
            Ok(Column::new(name.into(), values))
        }
        (ColumnKind::Categorical { categories }, _) => {
            if categories.is_empty() {
                return Err(SynthesisError::Distribution {
                    column: name.to_string(),
                    message: "no categories to draw from".to_string(),
                });
            }
            let values: Vec<&str> = (0..rows)
                .map(|_| categories[rng.gen_range(0..categories.len())].as_str())
                .collect();
            Ok(Column::new(name.into(), values))
        }
    }
}

/// Independent draws for each fixed column, in the given order.
///
/// # Errors
///
/// Propagates generator and DataFrame failures.
pub fn reference_table<R: Rng + ?Sized>(
    fixed: &[ColumnDefinition],
    rows: usize,
    rng: &mut R,
) -> Result<DataFrame, SynthesisError> {
    let mut columns = Vec::with_capacity(fixed.len());
    for definition in fixed {
        let distribution = FixedColumn::from_name(&definition.name)
            .map_or(ReferenceDistribution::Uniform, ReferenceDistribution::for_fixed);
        columns.push(generate_column(definition, distribution, rows, rng)?);
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rounding_respects_bounds() {
        assert_eq!(round_to(24.96, 1, 15.0, 40.0), 25.0);
        assert_eq!(round_to(1.96, 1, -2.0, 1.95), 1.95);
        assert_eq!(round_to(99.6, 0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn fixed_draws_stay_in_range_and_precision() {
        let mut rng = StdRng::seed_from_u64(7);
        let bmi = FixedColumn::Bmi.definition();
        let column = generate_column(
            &bmi,
            ReferenceDistribution::for_fixed(FixedColumn::Bmi),
            500,
            &mut rng,
        )
        .unwrap();
        for value in column.f64().unwrap().into_iter().flatten() {
            assert!((15.0..=40.0).contains(&value));
            assert!(((value * 10.0).round() - value * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn categorical_draws_use_defined_labels() {
        let mut rng = StdRng::seed_from_u64(11);
        let smoking = FixedColumn::SmokingStatus.definition();
        let column =
            generate_column(&smoking, ReferenceDistribution::Uniform, 200, &mut rng).unwrap();
        let categories = smoking.categories().unwrap();
        for value in column.str().unwrap().into_iter().flatten() {
            assert!(categories.iter().any(|c| c == value));
        }
    }

    #[test]
    fn reference_table_has_all_fixed_columns() {
        let mut rng = StdRng::seed_from_u64(3);
        let fixed: Vec<ColumnDefinition> =
            FixedColumn::ALL.iter().map(FixedColumn::definition).collect();
        let table = reference_table(&fixed, 25, &mut rng).unwrap();
        assert_eq!(table.height(), 25);
        assert_eq!(table.width(), 7);
    }
}
