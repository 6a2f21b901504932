//! Column definitions for the cohort schema.
//!
//! A column is either numeric (bounded range, optional display precision) or
//! categorical (ordered set of distinct labels). The seven fixed columns are
//! described by [`FixedColumn`]; user-defined columns are plain
//! [`ColumnDefinition`] values validated on entry to the schema.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Value domain of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Closed numeric interval `[min, max]`.
    Numeric {
        min: f64,
        max: f64,
        /// Decimal places values are rounded to. `None` keeps full precision.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decimals: Option<u32>,
    },
    /// Ordered set of category labels.
    Categorical { categories: Vec<String> },
}

impl ColumnKind {
    /// Short label used in messages and listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Numeric { .. } => "numeric",
            Self::Categorical { .. } => "categorical",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric { .. })
    }
}

/// A single column of the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

impl ColumnDefinition {
    /// Numeric column over `[min, max]` without rounding.
    pub fn numeric(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric {
                min,
                max,
                decimals: None,
            },
        }
    }

    /// Categorical column with the given labels, order preserved.
    pub fn categorical<I, S>(name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical {
                categories: categories.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Set the display precision of a numeric column. No effect on categorical columns.
    #[must_use]
    pub fn with_decimals(mut self, places: u32) -> Self {
        if let ColumnKind::Numeric { decimals, .. } = &mut self.kind {
            *decimals = Some(places);
        }
        self
    }

    /// Numeric bounds, if this is a numeric column.
    pub fn range(&self) -> Option<(f64, f64)> {
        match self.kind {
            ColumnKind::Numeric { min, max, .. } => Some((min, max)),
            ColumnKind::Categorical { .. } => None,
        }
    }

    /// Category labels, if this is a categorical column.
    pub fn categories(&self) -> Option<&[String]> {
        match &self.kind {
            ColumnKind::Numeric { .. } => None,
            ColumnKind::Categorical { categories } => Some(categories),
        }
    }

    /// Check the name and the kind-specific invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDefinition`] when the name is blank, the
    /// numeric range is empty or not finite, or the category list is empty,
    /// contains a blank label or repeats a label.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::invalid(&self.name, "column name is empty"));
        }
        match &self.kind {
            ColumnKind::Numeric { min, max, .. } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(SchemaError::invalid(&self.name, "range bounds must be finite"));
                }
                if min >= max {
                    return Err(SchemaError::invalid(
                        &self.name,
                        format!("range minimum {min} must be below maximum {max}"),
                    ));
                }
            }
            ColumnKind::Categorical { categories } => {
                if categories.is_empty() {
                    return Err(SchemaError::invalid(&self.name, "category list is empty"));
                }
                let mut seen = BTreeSet::new();
                for category in categories {
                    if category.trim().is_empty() {
                        return Err(SchemaError::invalid(&self.name, "category label is empty"));
                    }
                    if !seen.insert(category.as_str()) {
                        return Err(SchemaError::invalid(
                            &self.name,
                            format!("category '{category}' is listed twice"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// The immutable columns every cohort starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FixedColumn {
    Age,
    Bmi,
    BloodPressure,
    A1c,
    Cholesterol,
    SmokingStatus,
    DiabetesRisk,
}

/// Categories of the `SmokingStatus` column.
pub const SMOKING_STATUSES: [&str; 3] = ["Non-smoker", "Former smoker", "Current smoker"];

/// Categories of the `DiabetesRisk` column.
pub const DIABETES_RISK_LEVELS: [&str; 2] = ["0", "1"];

impl FixedColumn {
    /// All fixed columns in display order.
    pub const ALL: [FixedColumn; 7] = [
        FixedColumn::Age,
        FixedColumn::Bmi,
        FixedColumn::BloodPressure,
        FixedColumn::A1c,
        FixedColumn::Cholesterol,
        FixedColumn::SmokingStatus,
        FixedColumn::DiabetesRisk,
    ];

    /// Column name as it appears in the cohort.
    pub fn name(&self) -> &'static str {
        match self {
            FixedColumn::Age => "Age",
            FixedColumn::Bmi => "BMI",
            FixedColumn::BloodPressure => "BloodPressure",
            FixedColumn::A1c => "A1C",
            FixedColumn::Cholesterol => "Cholesterol",
            FixedColumn::SmokingStatus => "SmokingStatus",
            FixedColumn::DiabetesRisk => "DiabetesRisk",
        }
    }

    /// Look up a fixed column by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.name() == name)
    }

    /// Column definition, including the range the values are truncated to.
    pub fn definition(&self) -> ColumnDefinition {
        match self {
            FixedColumn::Age => ColumnDefinition::numeric(self.name(), 0.0, 100.0).with_decimals(0),
            FixedColumn::Bmi => ColumnDefinition::numeric(self.name(), 15.0, 40.0).with_decimals(1),
            FixedColumn::BloodPressure => {
                ColumnDefinition::numeric(self.name(), 80.0, 180.0).with_decimals(0)
            }
            FixedColumn::A1c => ColumnDefinition::numeric(self.name(), 4.0, 14.0).with_decimals(1),
            FixedColumn::Cholesterol => {
                ColumnDefinition::numeric(self.name(), 100.0, 300.0).with_decimals(0)
            }
            FixedColumn::SmokingStatus => {
                ColumnDefinition::categorical(self.name(), SMOKING_STATUSES)
            }
            FixedColumn::DiabetesRisk => {
                ColumnDefinition::categorical(self.name(), DIABETES_RISK_LEVELS)
            }
        }
    }
}

impl fmt::Display for FixedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
