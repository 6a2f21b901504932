//! Vega-Lite output.
//!
//! Each plot type maps to one mark. Aggregation the plot needs (binning,
//! counting, density estimation) is expressed in the Vega-Lite output and
//! left to the renderer; only the encoded columns are inlined as data.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use tracing::info;

use cohort_core::PlotSpec;
use cohort_model::PlotType;

use crate::common::ensure_parent_dir;
use crate::records::{cohort_records, field_type};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v6.json";

/// Writes [`PlotSpec`]s as Vega-Lite JSON.
#[derive(Debug, Clone)]
pub struct VegaLiteWriter {
    schema: String,
    title: Option<String>,
}

impl Default for VegaLiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VegaLiteWriter {
    pub fn new() -> Self {
        Self {
            schema: VEGA_LITE_SCHEMA.to_string(),
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the Vega-Lite specification.
    ///
    /// # Errors
    ///
    /// Density and box plots need a numeric x column. Fails as well when
    /// an encoded column is missing from the data.
    pub fn write(&self, spec: &PlotSpec) -> Result<Value> {
        let x = spec.encodings.x.as_str();
        let x_type = field_type(&spec.data, x);

        let mut vl = json!({
            "$schema": self.schema,
            "mark": plot_to_mark(spec.kind),
        });
        if let Some(title) = &self.title {
            vl["title"] = json!(title);
        }

        let count = json!({"aggregate": "count", "type": "quantitative"});
        let mut encoding = match spec.kind {
            PlotType::Scatter => {
                let y = spec
                    .encodings
                    .y
                    .as_deref()
                    .context("scatter plot has no y encoding")?;
                json!({
                    "x": {"field": x, "type": x_type},
                    "y": {"field": y, "type": field_type(&spec.data, y)},
                })
            }
            PlotType::Histogram if x_type == "quantitative" => json!({
                "x": {"field": x, "type": x_type, "bin": true},
                "y": count,
            }),
            PlotType::Histogram => json!({
                "x": {"field": x, "type": x_type},
                "y": count,
            }),
            PlotType::Density => {
                require_numeric(spec.kind, x, x_type)?;
                vl["transform"] = json!([{"density": x, "as": [x, "density"]}]);
                json!({
                    "x": {"field": x, "type": "quantitative"},
                    "y": {"field": "density", "type": "quantitative"},
                })
            }
            PlotType::BoxPlot => {
                require_numeric(spec.kind, x, x_type)?;
                json!({"x": {"field": x, "type": "quantitative"}})
            }
            PlotType::BarChart => {
                let x_type = if x_type == "quantitative" { "ordinal" } else { x_type };
                json!({
                    "x": {"field": x, "type": x_type},
                    "y": count,
                })
            }
        };

        if let Some(color) = spec.encodings.color.as_deref() {
            encoding["color"] = json!({"field": color, "type": field_type(&spec.data, color)});
        }
        vl["encoding"] = encoding;

        let fields = spec.fields();
        vl["data"] = json!({"values": cohort_records(&spec.data, Some(fields.as_slice()))?});
        Ok(vl)
    }

    /// Pretty-printed specification.
    pub fn render(&self, spec: &PlotSpec) -> Result<String> {
        let value = self.write(spec)?;
        serde_json::to_string_pretty(&value).context("serialize Vega-Lite specification")
    }

    /// Write the pretty-printed specification to `path`.
    pub fn write_to_path(&self, spec: &PlotSpec, path: &Path) -> Result<()> {
        let text = self.render(spec)?;
        ensure_parent_dir(path)?;
        fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), plot = %spec.kind, "wrote Vega-Lite specification");
        Ok(())
    }
}

/// Always clipped so marks stay inside the plot area.
fn plot_to_mark(plot: PlotType) -> Value {
    let mark_type = match plot {
        PlotType::Scatter => "point",
        PlotType::Histogram | PlotType::BarChart => "bar",
        PlotType::Density => "area",
        PlotType::BoxPlot => "boxplot",
    };
    json!({"type": mark_type, "clip": true})
}

fn require_numeric(plot: PlotType, field: &str, field_type: &str) -> Result<()> {
    if field_type != "quantitative" {
        bail!("{plot} needs a numeric x column, '{field}' is categorical");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_core::Cohort;
    use cohort_model::Encodings;
    use polars::prelude::{Column, DataFrame};

    fn spec(kind: PlotType, x: &str) -> PlotSpec {
        PlotSpec {
            kind,
            encodings: Encodings {
                x: x.to_string(),
                y: None,
                color: None,
            },
            data: Cohort::new(
                DataFrame::new(vec![
                    Column::new("A1C".into(), vec![5.4, 7.9, 6.1]),
                    Column::new("SmokingStatus".into(), vec!["Non-smoker", "Current smoker", "Non-smoker"]),
                ])
                .unwrap(),
            ),
        }
    }

    #[test]
    fn histogram_bins_numeric_x() {
        let vl = VegaLiteWriter::new().write(&spec(PlotType::Histogram, "A1C")).unwrap();
        assert_eq!(vl["mark"]["type"], "bar");
        assert_eq!(vl["encoding"]["x"]["bin"], true);
        assert_eq!(vl["encoding"]["y"]["aggregate"], "count");
        assert_eq!(vl["data"]["values"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn density_adds_transform() {
        let vl = VegaLiteWriter::new().write(&spec(PlotType::Density, "A1C")).unwrap();
        assert_eq!(vl["mark"]["type"], "area");
        assert_eq!(vl["transform"][0]["density"], "A1C");
        assert_eq!(vl["encoding"]["y"]["field"], "density");
    }

    #[test]
    fn density_rejects_categorical_x() {
        let err = VegaLiteWriter::new()
            .write(&spec(PlotType::Density, "SmokingStatus"))
            .unwrap_err();
        assert!(err.to_string().contains("SmokingStatus"));
    }

    #[test]
    fn only_encoded_fields_are_inlined() {
        let vl = VegaLiteWriter::new().write(&spec(PlotType::BoxPlot, "A1C")).unwrap();
        assert_eq!(vl["data"]["values"][1], json!({"A1C": 7.9}));
    }

    #[test]
    fn title_is_optional() {
        let plain = VegaLiteWriter::new().write(&spec(PlotType::BarChart, "SmokingStatus")).unwrap();
        assert!(plain.get("title").is_none());
        let titled = VegaLiteWriter::new()
            .with_title("Smoking")
            .write(&spec(PlotType::BarChart, "SmokingStatus"))
            .unwrap();
        assert_eq!(titled["title"], "Smoking");
    }
}
