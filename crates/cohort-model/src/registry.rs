//! Schema registry: owns the column set and its filter state.
//!
//! Every mutation is all-or-nothing. A rejected add or remove leaves both the
//! schema and the filter entries exactly as they were.

use crate::column::ColumnDefinition;
use crate::error::{FilterError, SchemaError};
use crate::filter::{FilterState, FilterValue};
use crate::schema::Schema;

/// Owner of the evolving schema and its per-column filters.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    schema: Schema,
    filters: FilterState,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Registry with the fixed columns and accept-all filters.
    pub fn new() -> Self {
        let schema = Schema::new();
        let filters = FilterState::defaults_for(&schema);
        Self { schema, filters }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Columns in display order, fixed first.
    pub fn list_columns(&self) -> Vec<ColumnDefinition> {
        self.schema.columns().cloned().collect()
    }

    /// Append a custom column and give it an accept-all filter.
    ///
    /// The name is trimmed before it is stored.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateName`] when the name matches an existing column
    /// (case-insensitive), [`SchemaError::InvalidDefinition`] when the
    /// definition breaks its range or category invariants.
    pub fn add_column(&mut self, definition: ColumnDefinition) -> Result<(), SchemaError> {
        let mut definition = definition;
        definition.name = definition.name.trim().to_string();
        definition.validate()?;
        if let Some(existing) = self.schema.find_collision(&definition.name) {
            return Err(SchemaError::DuplicateName(existing.name.clone()));
        }
        self.filters
            .insert(definition.name.clone(), FilterValue::accept_all(&definition));
        self.schema.push_custom(definition);
        Ok(())
    }

    /// Remove a custom column together with its filter entry.
    ///
    /// # Errors
    ///
    /// [`SchemaError::FixedColumn`] for a fixed column, [`SchemaError::NotFound`]
    /// when no custom column has this name.
    pub fn remove_column(&mut self, name: &str) -> Result<ColumnDefinition, SchemaError> {
        if self.schema.is_fixed(name) {
            return Err(SchemaError::FixedColumn(name.to_string()));
        }
        let removed = self
            .schema
            .remove_custom(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        self.filters.remove(name);
        self.filters.prune(&self.schema);
        Ok(removed)
    }

    /// Replace the filter of one column.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownColumn`] when the column is not in the schema,
    /// or any error from [`FilterValue::validate_for`].
    pub fn set_filter(&mut self, column: &str, value: FilterValue) -> Result<(), FilterError> {
        let definition = self
            .schema
            .get(column)
            .ok_or_else(|| FilterError::UnknownColumn(column.to_string()))?;
        value.validate_for(definition)?;
        self.filters.insert(column, value);
        Ok(())
    }

    /// Restore the accept-all filter of one column.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownColumn`] when the column is not in the schema.
    pub fn reset_filter(&mut self, column: &str) -> Result<(), FilterError> {
        let definition = self
            .schema
            .get(column)
            .ok_or_else(|| FilterError::UnknownColumn(column.to_string()))?;
        let value = FilterValue::accept_all(definition);
        self.filters.insert(column, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_restores_columns() {
        let mut registry = SchemaRegistry::new();
        let before = registry.list_columns();
        registry
            .add_column(ColumnDefinition::numeric("HbA1cTrend", -2.0, 2.0))
            .unwrap();
        assert_eq!(registry.list_columns().len(), before.len() + 1);
        registry.remove_column("HbA1cTrend").unwrap();
        assert_eq!(registry.list_columns(), before);
        assert!(registry.filters().get("HbA1cTrend").is_none());
    }

    #[test]
    fn duplicate_of_fixed_column_is_rejected() {
        let mut registry = SchemaRegistry::new();
        let before = registry.clone();
        let err = registry
            .add_column(ColumnDefinition::numeric("Age", 0.0, 1.0))
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateName("Age".to_string()));
        assert_eq!(registry, before);
    }

    #[test]
    fn fixed_column_cannot_be_removed() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(
            registry.remove_column("BMI").unwrap_err(),
            SchemaError::FixedColumn("BMI".to_string())
        );
    }

    #[test]
    fn unknown_column_removal_is_not_found() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(
            registry.remove_column("Weight").unwrap_err(),
            SchemaError::NotFound("Weight".to_string())
        );
    }

    #[test]
    fn add_trims_name_and_sets_default_filter() {
        let mut registry = SchemaRegistry::new();
        registry
            .add_column(ColumnDefinition::categorical(" Site ", ["North", "South"]))
            .unwrap();
        assert!(registry.schema().contains("Site"));
        assert_eq!(
            registry.filters().get("Site"),
            Some(&FilterValue::set(["North", "South"]))
        );
    }

    #[test]
    fn rejected_filter_keeps_previous_value() {
        let mut registry = SchemaRegistry::new();
        registry.set_filter("BMI", FilterValue::range(20.0, 30.0)).unwrap();
        assert!(registry.set_filter("BMI", FilterValue::range(30.0, 20.0)).is_err());
        assert_eq!(
            registry.filters().get("BMI"),
            Some(&FilterValue::range(20.0, 30.0))
        );
        registry.reset_filter("BMI").unwrap();
        assert_eq!(
            registry.filters().get("BMI"),
            Some(&FilterValue::range(15.0, 40.0))
        );
    }
}
