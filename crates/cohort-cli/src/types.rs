use std::path::PathBuf;

use cohort_core::{Cohort, ColumnSummary, PlotSpec};

#[derive(Debug)]
pub struct GenerateResult {
    pub method: String,
    pub synthesized_rows: usize,
    pub cohort: Cohort,
    pub summaries: Vec<ColumnSummary>,
    pub plot: PlotSpec,
    pub outputs: OutputPaths,
}

#[derive(Debug, Default)]
pub struct OutputPaths {
    pub csv: Option<PathBuf>,
    pub vega_lite: Option<PathBuf>,
}
