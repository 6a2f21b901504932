//! TOML configuration for a cohort session.
//!
//! ```toml
//! [session]
//! initial_rows = 500
//! seed = 7
//! color_policy = "reject"
//!
//! [session.row_bounds]
//! min = 100
//! max = 10000
//!
//! [synthesis]
//! method = "bootstrap"
//!
//! [[columns]]
//! name = "HbA1cTrend"
//! kind = "numeric"
//! min = -2.0
//! max = 2.0
//! decimals = 2
//!
//! [[filters]]
//! column = "BMI"
//! type = "range"
//! low = 20.0
//! high = 30.0
//!
//! [plot]
//! plot_type = "scatter"
//! x_var = "Age"
//! y_var = "HbA1cTrend"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use cohort_core::{IdentitySampler, MarginalBootstrap, SessionOptions, SynthesisCapability};
use cohort_model::{ColumnDefinition, FilterValue, SchemaRegistry, Selection};

/// Which synthesis capability to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMethod {
    /// Independent per-column resampling.
    #[default]
    Bootstrap,
    /// Reference sample passed through unchanged.
    Identity,
}

impl SynthesisMethod {
    pub fn capability(self) -> Box<dyn SynthesisCapability> {
        match self {
            Self::Bootstrap => Box::new(MarginalBootstrap),
            Self::Identity => Box::new(IdentitySampler),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub method: SynthesisMethod,
}

/// A filter on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub column: String,
    #[serde(flatten)]
    pub value: FilterValue,
}

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortConfig {
    pub session: SessionOptions,
    pub synthesis: SynthesisConfig,
    pub columns: Vec<ColumnDefinition>,
    pub filters: Vec<FilterEntry>,
    pub plot: Option<Selection>,
}

impl CohortConfig {
    /// Parse a configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse configuration")
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config =
            Self::from_toml_str(&content).with_context(|| format!("load {}", path.display()))?;
        info!(
            path = %path.display(),
            columns = config.columns.len(),
            filters = config.filters.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Registry with the configured custom columns and filters applied in
    /// file order.
    pub fn registry(&self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        for column in &self.columns {
            registry
                .add_column(column.clone())
                .with_context(|| format!("add column '{}'", column.name))?;
        }
        for filter in &self.filters {
            registry
                .set_filter(&filter.column, filter.value.clone())
                .with_context(|| format!("set filter on '{}'", filter.column))?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_model::{ColorPolicy, PlotType};

    #[test]
    fn empty_document_uses_defaults() {
        let config = CohortConfig::from_toml_str("").unwrap();
        assert_eq!(config, CohortConfig::default());
        assert_eq!(config.session.initial_rows, 1_000);
        assert_eq!(config.synthesis.method, SynthesisMethod::Bootstrap);
    }

    #[test]
    fn parses_full_document() {
        let config = CohortConfig::from_toml_str(
            r#"
            [session]
            initial_rows = 250
            seed = 3
            color_policy = "reject"

            [synthesis]
            method = "identity"

            [[columns]]
            name = "Region"
            kind = "categorical"
            categories = ["North", "South"]

            [[filters]]
            column = "Region"
            type = "set"
            selected = ["North"]

            [plot]
            plot_type = "bar_chart"
            x_var = "Region"
            "#,
        )
        .unwrap();

        assert_eq!(config.session.seed, Some(3));
        assert_eq!(config.session.color_policy, ColorPolicy::Reject);
        assert_eq!(config.session.row_bounds.max, 10_000);
        assert_eq!(config.synthesis.method, SynthesisMethod::Identity);
        assert_eq!(config.filters[0].value, FilterValue::set(["North"]));
        let plot = config.plot.as_ref().unwrap();
        assert_eq!(plot.plot_type, PlotType::BarChart);
        assert_eq!(plot.y_var, None);

        let registry = config.registry().unwrap();
        assert!(registry.schema().contains("Region"));
        assert_eq!(registry.filters().get("Region"), Some(&FilterValue::set(["North"])));
    }

    #[test]
    fn invalid_filter_is_reported_with_column() {
        let config = CohortConfig::from_toml_str(
            r#"
            [[filters]]
            column = "BMI"
            type = "range"
            low = 30.0
            high = 20.0
            "#,
        )
        .unwrap();
        let err = config.registry().unwrap_err();
        assert!(format!("{err:#}").contains("BMI"));
    }
}
