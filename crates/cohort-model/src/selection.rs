//! Plot type and variable bindings chosen by the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::schema::Schema;

/// Supported plot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotType {
    Scatter,
    #[default]
    Histogram,
    Density,
    BoxPlot,
    BarChart,
}

impl PlotType {
    pub const ALL: [PlotType; 5] = [
        PlotType::Scatter,
        PlotType::Histogram,
        PlotType::Density,
        PlotType::BoxPlot,
        PlotType::BarChart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlotType::Scatter => "Scatter",
            PlotType::Histogram => "Histogram",
            PlotType::Density => "Density",
            PlotType::BoxPlot => "BoxPlot",
            PlotType::BarChart => "BarChart",
        }
    }

    /// Only scatter plots bind a y variable.
    pub fn requires_y(&self) -> bool {
        matches!(self, PlotType::Scatter)
    }

    /// Scatter plots and bar charts accept a color variable.
    pub fn supports_color(&self) -> bool {
        matches!(self, PlotType::Scatter | PlotType::BarChart)
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotType {
    type Err = String;

    /// Case-insensitive; accepts `box`, `boxplot`, `bar`, `barchart` and the
    /// hyphen/underscore variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "scatter" => Ok(PlotType::Scatter),
            "histogram" | "hist" => Ok(PlotType::Histogram),
            "density" => Ok(PlotType::Density),
            "boxplot" | "box" => Ok(PlotType::BoxPlot),
            "barchart" | "bar" => Ok(PlotType::BarChart),
            _ => Err(format!("Unknown plot type: {s}")),
        }
    }
}

/// What to do with a color variable on a plot type that cannot use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPolicy {
    /// Drop the color encoding without signaling.
    #[default]
    Ignore,
    /// Fail with [`SelectionError::InapplicableColorVariable`].
    Reject,
}

/// Plot type plus variable bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub plot_type: PlotType,
    pub x_var: String,
    #[serde(default)]
    pub y_var: Option<String>,
    #[serde(default)]
    pub color_var: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            plot_type: PlotType::Histogram,
            x_var: "Age".to_string(),
            y_var: Some("BMI".to_string()),
            color_var: None,
        }
    }
}

/// Partial selection change. `None` leaves a field untouched; for the
/// optional bindings `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionUpdate {
    #[serde(default)]
    pub plot_type: Option<PlotType>,
    #[serde(default)]
    pub x_var: Option<String>,
    #[serde(default)]
    pub y_var: Option<Option<String>>,
    #[serde(default)]
    pub color_var: Option<Option<String>>,
}

impl SelectionUpdate {
    pub fn plot_type(mut self, plot_type: PlotType) -> Self {
        self.plot_type = Some(plot_type);
        self
    }

    pub fn x(mut self, column: impl Into<String>) -> Self {
        self.x_var = Some(column.into());
        self
    }

    pub fn y(mut self, column: Option<String>) -> Self {
        self.y_var = Some(column);
        self
    }

    pub fn color(mut self, column: Option<String>) -> Self {
        self.color_var = Some(column);
        self
    }
}

/// Channel bindings that survived validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encodings {
    pub x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Selection {
    pub fn new(plot_type: PlotType, x_var: impl Into<String>) -> Self {
        Self {
            plot_type,
            x_var: x_var.into(),
            y_var: None,
            color_var: None,
        }
    }

    #[must_use]
    pub fn with_y(mut self, column: impl Into<String>) -> Self {
        self.y_var = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, column: impl Into<String>) -> Self {
        self.color_var = Some(column.into());
        self
    }

    /// Apply a partial update, returning the resulting selection.
    #[must_use]
    pub fn updated(&self, update: &SelectionUpdate) -> Self {
        let mut next = self.clone();
        if let Some(plot_type) = update.plot_type {
            next.plot_type = plot_type;
        }
        if let Some(x) = &update.x_var {
            next.x_var.clone_from(x);
        }
        if let Some(y) = &update.y_var {
            next.y_var.clone_from(y);
        }
        if let Some(color) = &update.color_var {
            next.color_var.clone_from(color);
        }
        next
    }

    /// Validate the bindings against the schema and produce the encodings.
    ///
    /// Every set binding must name a schema column, whatever the plot type.
    /// The y binding is then only read for scatter plots, and an
    /// inapplicable color binding is dropped or rejected according to
    /// `policy`.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] when a bound column is unknown, a scatter
    /// plot has no y variable, or (with [`ColorPolicy::Reject`]) a color
    /// variable is set on a plot type that cannot use it.
    pub fn encodings(
        &self,
        schema: &Schema,
        policy: ColorPolicy,
    ) -> Result<Encodings, SelectionError> {
        require_column(schema, &self.x_var)?;
        for column in self.y_var.iter().chain(&self.color_var) {
            require_column(schema, column)?;
        }

        let y = if self.plot_type.requires_y() {
            let y = self.y_var.as_ref().ok_or(SelectionError::MissingRequiredVariable {
                plot: self.plot_type.as_str(),
                variable: "y",
            })?;
            Some(y.clone())
        } else {
            None
        };

        let color = match &self.color_var {
            Some(column) if self.plot_type.supports_color() => Some(column.clone()),
            Some(column) => match policy {
                ColorPolicy::Ignore => None,
                ColorPolicy::Reject => {
                    return Err(SelectionError::InapplicableColorVariable {
                        plot: self.plot_type.as_str(),
                        column: column.clone(),
                    });
                }
            },
            None => None,
        };

        Ok(Encodings {
            x: self.x_var.clone(),
            y,
            color,
        })
    }

    /// Reset bindings that no longer name a schema column.
    ///
    /// `x_var` falls back to the first column; a dangling `y_var` becomes the
    /// first column other than `x_var` for scatter plots and is cleared
    /// otherwise; a dangling `color_var` is cleared. Returns true when any
    /// field changed.
    pub fn repair(&mut self, schema: &Schema) -> bool {
        let mut changed = false;
        let names = schema.column_names();

        if !schema.contains(&self.x_var) {
            if let Some(first) = names.first() {
                self.x_var = (*first).to_string();
                changed = true;
            }
        }

        if let Some(y) = &self.y_var {
            if !schema.contains(y) {
                self.y_var = if self.plot_type.requires_y() {
                    names
                        .iter()
                        .find(|name| **name != self.x_var)
                        .or(names.first())
                        .map(|name| (*name).to_string())
                } else {
                    None
                };
                changed = true;
            }
        }

        if let Some(color) = &self.color_var {
            if !schema.contains(color) {
                self.color_var = None;
                changed = true;
            }
        }

        changed
    }
}

fn require_column(schema: &Schema, name: &str) -> Result<(), SelectionError> {
    if schema.contains(name) {
        Ok(())
    } else {
        Err(SelectionError::UnknownColumn(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plot_type_aliases() {
        assert_eq!("box-plot".parse::<PlotType>(), Ok(PlotType::BoxPlot));
        assert_eq!("BAR".parse::<PlotType>(), Ok(PlotType::BarChart));
        assert_eq!("scatter".parse::<PlotType>(), Ok(PlotType::Scatter));
        assert!("pie".parse::<PlotType>().is_err());
    }

    #[test]
    fn update_clears_optional_fields() {
        let selection = Selection::new(PlotType::Scatter, "Age")
            .with_y("BMI")
            .with_color("SmokingStatus");
        let next = selection.updated(&SelectionUpdate::default().color(None));
        assert_eq!(next.color_var, None);
        assert_eq!(next.y_var.as_deref(), Some("BMI"));
    }

    #[test]
    fn histogram_ignores_y() {
        let schema = Schema::new();
        let selection = Selection::new(PlotType::Histogram, "Age").with_y("BMI");
        let encodings = selection.encodings(&schema, ColorPolicy::Ignore).unwrap();
        assert_eq!(encodings.y, None);
    }

    #[test]
    fn unused_bindings_must_still_exist() {
        let schema = Schema::new();
        let err = Selection::new(PlotType::Histogram, "Age")
            .with_y("Nope")
            .encodings(&schema, ColorPolicy::Ignore)
            .unwrap_err();
        assert_eq!(err, SelectionError::UnknownColumn("Nope".to_string()));

        let err = Selection::new(PlotType::Density, "Age")
            .with_color("Ghost")
            .encodings(&schema, ColorPolicy::Ignore)
            .unwrap_err();
        assert_eq!(err, SelectionError::UnknownColumn("Ghost".to_string()));
    }
}
