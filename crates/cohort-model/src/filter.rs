//! Per-column filter predicates.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::column::{ColumnDefinition, ColumnKind};
use crate::error::FilterError;
use crate::schema::Schema;

/// Predicate applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterValue {
    /// Inclusive numeric interval.
    Range { low: f64, high: f64 },
    /// Accepted categories. An empty set matches nothing.
    Set { selected: BTreeSet<String> },
}

impl FilterValue {
    pub fn range(low: f64, high: f64) -> Self {
        Self::Range { low, high }
    }

    pub fn set<I, S>(selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set {
            selected: selected.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter that accepts every value of the column: full range or all categories.
    pub fn accept_all(column: &ColumnDefinition) -> Self {
        match &column.kind {
            ColumnKind::Numeric { min, max, .. } => Self::range(*min, *max),
            ColumnKind::Categorical { categories } => Self::set(categories.iter().cloned()),
        }
    }

    /// Check that this filter fits the column's kind and value domain.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] when the kind differs, a range is inverted
    /// or leaves the column range, or a category is not defined on the column.
    pub fn validate_for(&self, column: &ColumnDefinition) -> Result<(), FilterError> {
        match (self, &column.kind) {
            (Self::Range { low, high }, ColumnKind::Numeric { min, max, .. }) => {
                if low > high || low.is_nan() || high.is_nan() {
                    return Err(FilterError::InvertedRange {
                        column: column.name.clone(),
                        low: *low,
                        high: *high,
                    });
                }
                if low < min || high > max {
                    return Err(FilterError::OutOfRange {
                        column: column.name.clone(),
                        low: *low,
                        high: *high,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(())
            }
            (Self::Set { selected }, ColumnKind::Categorical { categories }) => {
                if let Some(unknown) = selected.iter().find(|value| !categories.contains(value)) {
                    return Err(FilterError::UnknownCategory {
                        column: column.name.clone(),
                        category: unknown.clone(),
                    });
                }
                Ok(())
            }
            (_, kind) => Err(FilterError::KindMismatch {
                column: column.name.clone(),
                expected: if kind.is_numeric() { "range" } else { "category set" },
            }),
        }
    }

    /// Does a numeric cell pass? Set filters never match numbers.
    pub fn matches_number(&self, value: f64) -> bool {
        match self {
            Self::Range { low, high } => *low <= value && value <= *high,
            Self::Set { .. } => false,
        }
    }

    /// Does a categorical cell pass? Range filters never match labels.
    pub fn matches_category(&self, value: &str) -> bool {
        match self {
            Self::Set { selected } => selected.contains(value),
            Self::Range { .. } => false,
        }
    }
}

/// Filter entries keyed by column name.
///
/// A column without an entry accepts every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterState {
    /// Accept-all entries for every column of the schema.
    pub fn defaults_for(schema: &Schema) -> Self {
        let entries = schema
            .columns()
            .map(|column| (column.name.clone(), FilterValue::accept_all(column)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.entries.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, column: impl Into<String>, value: FilterValue) {
        self.entries.insert(column.into(), value);
    }

    pub(crate) fn remove(&mut self, column: &str) -> Option<FilterValue> {
        self.entries.remove(column)
    }

    /// Drop entries whose column is no longer in the schema. Returns the
    /// number of entries removed.
    pub fn prune(&mut self, schema: &Schema) -> usize {
        let before = self.entries.len();
        self.entries.retain(|name, _| schema.contains(name));
        before - self.entries.len()
    }
}
