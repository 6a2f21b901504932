//! Selection resolution into a renderer-agnostic plot description.

use cohort_model::{ColorPolicy, Encodings, PlotType, Schema, Selection, SelectionError};
use serde::Serialize;

use crate::frame::Cohort;

/// Declarative plot description. No aggregation or binning has been
/// applied; that is left to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSpec {
    pub kind: PlotType,
    pub encodings: Encodings,
    #[serde(skip)]
    pub data: Cohort,
}

impl PlotSpec {
    /// Encoded column names, x first.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.encodings.x.as_str()];
        fields.extend(self.encodings.y.as_deref());
        fields.extend(self.encodings.color.as_deref());
        fields
    }
}

/// Validate `selection` against `schema` and bind it to `cohort`.
///
/// Every encoded column must also be present in the cohort data; a
/// cohort synthesized before a column was added does not carry it.
///
/// # Errors
///
/// Any [`SelectionError`] from [`Selection::encodings`], or
/// [`SelectionError::UnknownColumn`] when the cohort lacks an encoded column.
pub fn resolve(
    selection: &Selection,
    schema: &Schema,
    cohort: &Cohort,
    policy: ColorPolicy,
) -> Result<PlotSpec, SelectionError> {
    let encodings = selection.encodings(schema, policy)?;
    let spec = PlotSpec {
        kind: selection.plot_type,
        encodings,
        data: cohort.clone(),
    };
    if let Some(missing) = spec.fields().into_iter().find(|f| !cohort.has_column(f)) {
        return Err(SelectionError::UnknownColumn(missing.to_string()));
    }
    Ok(spec)
}
