//! Row-oriented JSON conversion.

use anyhow::{Context, Result, bail};
use polars::prelude::{Column, DataType};
use serde_json::{Map, Value, json};

use cohort_core::Cohort;

/// Vega-Lite measurement type for a cohort column: `quantitative` for
/// numeric dtypes, `nominal` for everything else.
pub fn field_type(cohort: &Cohort, field: &str) -> &'static str {
    match cohort.data().column(field).map(Column::dtype) {
        Ok(dtype) if is_numeric(dtype) => "quantitative",
        _ => "nominal",
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

fn column_values(cohort: &Cohort, field: &str) -> Result<Vec<Value>> {
    let column = cohort
        .data()
        .column(field)
        .with_context(|| format!("missing column {field}"))?;
    let values = match column.dtype() {
        dtype if is_numeric(dtype) => cohort
            .numeric_values(field)?
            .into_iter()
            .map(|value| value.map_or(Value::Null, |v| json!(v)))
            .collect(),
        DataType::String => cohort
            .category_values(field)?
            .into_iter()
            .map(|value| value.map_or(Value::Null, Value::String))
            .collect(),
        other => bail!("column {field} has unsupported type {other}"),
    };
    Ok(values)
}

/// Convert the cohort into one JSON object per row.
///
/// With `fields` set only those columns are emitted, in that order;
/// otherwise every column is emitted in frame order.
pub fn cohort_records(cohort: &Cohort, fields: Option<&[&str]>) -> Result<Vec<Value>> {
    let names: Vec<String> = match fields {
        Some(fields) => fields.iter().map(|f| (*f).to_string()).collect(),
        None => cohort.column_names(),
    };
    let columns = names
        .iter()
        .map(|name| column_values(cohort, name))
        .collect::<Result<Vec<_>>>()?;

    let records = (0..cohort.row_count())
        .map(|row| {
            let mut record = Map::new();
            for (name, values) in names.iter().zip(&columns) {
                record.insert(name.clone(), values[row].clone());
            }
            Value::Object(record)
        })
        .collect();
    Ok(records)
}
