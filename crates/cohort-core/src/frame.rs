//! Cohort frame type.
//!
//! A [`Cohort`] wraps a Polars DataFrame whose columns follow the schema:
//! numeric columns are `Float64`, categorical columns are `String`. The frame
//! is never mutated after construction; filtering and column removal return
//! new cohorts.

use cohort_model::{ColumnKind, Schema};
use polars::prelude::{AnyValue, DataFrame, DataType};

use crate::error::Result;

/// A single cell read out of a cohort.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Category(String),
    Missing,
}

impl CellValue {
    fn from_any(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Missing,
            AnyValue::Float64(v) => Self::Number(v),
            AnyValue::Float32(v) => Self::Number(f64::from(v)),
            AnyValue::Int32(v) => Self::Number(f64::from(v)),
            AnyValue::Int64(v) => Self::Number(v as f64),
            AnyValue::UInt32(v) => Self::Number(f64::from(v)),
            AnyValue::String(s) => Self::Category(s.to_string()),
            AnyValue::StringOwned(s) => Self::Category(s.to_string()),
            other => Self::Category(other.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(s) => Some(s),
            _ => None,
        }
    }
}

/// Per-column summary for tabular display.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSummary {
    Numeric {
        name: String,
        count: usize,
        min: Option<f64>,
        max: Option<f64>,
        mean: Option<f64>,
    },
    Categorical {
        name: String,
        /// Counts in the schema's category order.
        counts: Vec<(String, usize)>,
    },
}

impl ColumnSummary {
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Categorical { name, .. } => name,
        }
    }
}

/// An immutable table of synthesized rows.
#[derive(Debug, Clone)]
pub struct Cohort {
    data: DataFrame,
}

impl PartialEq for Cohort {
    fn eq(&self, other: &Self) -> bool {
        self.data.equals(&other.data)
    }
}

impl Cohort {
    pub fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// The underlying frame.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Column names in frame order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Read a single cell. `None` when the row or column does not exist.
    pub fn value(&self, row: usize, column: &str) -> Option<CellValue> {
        let column = self.data.column(column).ok()?;
        column.get(row).ok().map(CellValue::from_any)
    }

    /// All values of a numeric column, cast to `f64`.
    ///
    /// # Errors
    ///
    /// Fails when the column is missing or cannot be cast.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.data.column(name)?.cast(&DataType::Float64)?;
        Ok(column.f64()?.into_iter().collect())
    }

    /// All values of a categorical column.
    ///
    /// # Errors
    ///
    /// Fails when the column is missing or is not a string column.
    pub fn category_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self.data.column(name)?;
        Ok(column
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    /// A new cohort without the named column. Missing columns are ignored.
    ///
    /// # Errors
    ///
    /// Propagates DataFrame failures.
    pub fn without_column(&self, name: &str) -> Result<Cohort> {
        if !self.has_column(name) {
            return Ok(self.clone());
        }
        Ok(Cohort::new(self.data.drop(name)?))
    }

    /// Summaries for every schema column present in the cohort.
    ///
    /// # Errors
    ///
    /// Fails when a column's dtype does not match its schema kind.
    pub fn summarize(&self, schema: &Schema) -> Result<Vec<ColumnSummary>> {
        let mut summaries = Vec::with_capacity(schema.len());
        for definition in schema.columns() {
            if !self.has_column(&definition.name) {
                continue;
            }
            let summary = match &definition.kind {
                ColumnKind::Numeric { .. } => {
                    let values: Vec<f64> = self
                        .numeric_values(&definition.name)?
                        .into_iter()
                        .flatten()
                        .collect();
                    let count = values.len();
                    let min = values.iter().copied().reduce(f64::min);
                    let max = values.iter().copied().reduce(f64::max);
                    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
                    ColumnSummary::Numeric {
                        name: definition.name.clone(),
                        count,
                        min,
                        max,
                        mean,
                    }
                }
                ColumnKind::Categorical { categories } => {
                    let values = self.category_values(&definition.name)?;
                    let counts = categories
                        .iter()
                        .map(|category| {
                            let count = values
                                .iter()
                                .filter(|value| value.as_deref() == Some(category.as_str()))
                                .count();
                            (category.clone(), count)
                        })
                        .collect();
                    ColumnSummary::Categorical {
                        name: definition.name.clone(),
                        counts,
                    }
                }
            };
            summaries.push(summary);
        }
        Ok(summaries)
    }
}
