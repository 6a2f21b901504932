//! CSV export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, SerWriter};
use tracing::info;

use cohort_core::Cohort;

use crate::common::ensure_parent_dir;

fn write_csv<W: Write>(writer: W, cohort: &Cohort) -> Result<()> {
    let mut data = cohort.data().clone();
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut data)
        .context("serialize cohort as CSV")?;
    Ok(())
}

/// Write the cohort to `path`, creating parent directories as needed.
pub fn write_cohort_csv(path: &Path, cohort: &Cohort) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(BufWriter::new(file), cohort)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = cohort.row_count(), "wrote cohort CSV");
    Ok(())
}

/// The cohort as CSV text.
pub fn cohort_to_csv_string(cohort: &Cohort) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, cohort)?;
    String::from_utf8(buffer).context("CSV output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame};

    #[test]
    fn writes_header_and_rows_in_order() {
        let cohort = Cohort::new(
            DataFrame::new(vec![
                Column::new("Age".into(), vec![41.0, 67.0]),
                Column::new("DiabetesRisk".into(), vec!["1", "0"]),
            ])
            .unwrap(),
        );
        let csv = cohort_to_csv_string(&cohort).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Age,DiabetesRisk");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("41"));
        assert!(lines[2].ends_with(",0"));
    }
}
