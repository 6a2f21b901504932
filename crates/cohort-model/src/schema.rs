//! Ordered cohort schema: fixed columns followed by custom columns.

use serde::Serialize;

use crate::column::{ColumnDefinition, FixedColumn};

/// The set of columns currently governing cohort shape.
///
/// Fixed columns come first in [`FixedColumn::ALL`] order; custom columns
/// follow in insertion order. Mutation goes through the schema registry,
/// which enforces name uniqueness and definition validity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    fixed: Vec<ColumnDefinition>,
    custom: Vec<ColumnDefinition>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Schema holding only the fixed columns.
    pub fn new() -> Self {
        Self {
            fixed: FixedColumn::ALL.iter().map(FixedColumn::definition).collect(),
            custom: Vec::new(),
        }
    }

    /// All columns, fixed first.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.fixed.iter().chain(self.custom.iter())
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns().map(|column| column.name.as_str()).collect()
    }

    pub fn fixed(&self) -> &[ColumnDefinition] {
        &self.fixed
    }

    pub fn custom(&self) -> &[ColumnDefinition] {
        &self.custom
    }

    pub fn len(&self) -> usize {
        self.fixed.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a column by exact name.
    pub fn get(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns().find(|column| column.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True if `name` belongs to the immutable fixed part.
    pub fn is_fixed(&self, name: &str) -> bool {
        self.fixed.iter().any(|column| column.name == name)
    }

    /// Case-insensitive name lookup, used for collision checks.
    pub fn find_collision(&self, name: &str) -> Option<&ColumnDefinition> {
        let needle = name.trim();
        self.columns()
            .find(|column| column.name.trim().eq_ignore_ascii_case(needle))
    }

    pub(crate) fn push_custom(&mut self, definition: ColumnDefinition) {
        self.custom.push(definition);
    }

    pub(crate) fn remove_custom(&mut self, name: &str) -> Option<ColumnDefinition> {
        let index = self.custom.iter().position(|column| column.name == name)?;
        Some(self.custom.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_columns_in_order() {
        let schema = Schema::new();
        assert_eq!(
            schema.column_names(),
            vec![
                "Age",
                "BMI",
                "BloodPressure",
                "A1C",
                "Cholesterol",
                "SmokingStatus",
                "DiabetesRisk"
            ]
        );
        assert!(schema.custom().is_empty());
    }

    #[test]
    fn collision_is_case_insensitive() {
        let schema = Schema::new();
        assert!(schema.find_collision("age").is_some());
        assert!(schema.find_collision(" BMI ").is_some());
        assert!(schema.find_collision("Weight").is_none());
    }

    #[test]
    fn custom_columns_follow_fixed() {
        let mut schema = Schema::new();
        schema.push_custom(ColumnDefinition::numeric("Weight", 40.0, 150.0));
        assert_eq!(schema.column_names().last(), Some(&"Weight"));
        assert!(!schema.is_fixed("Weight"));
        assert!(schema.is_fixed("Age"));
        assert_eq!(schema.len(), 8);
    }
}
