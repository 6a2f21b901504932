use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cohort_core::{CellValue, Cohort, ColumnSummary};
use cohort_model::{ColumnKind, FilterState, FilterValue, Schema};

use crate::types::GenerateResult;

pub fn print_columns(schema: &Schema, filters: &FilterState) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Values"),
        header_cell("Filter"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    for definition in schema.columns() {
        let source = if schema.is_fixed(&definition.name) {
            dim_cell("fixed")
        } else {
            Cell::new("custom").fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(&definition.name).add_attribute(Attribute::Bold),
            Cell::new(definition.kind.label()),
            Cell::new(domain_text(&definition.kind)),
            filter_cell(filters.get(&definition.name)),
            source,
        ]);
    }
    println!("{table}");
}

pub fn print_summary(result: &GenerateResult, preview: usize) {
    println!("Method: {}", result.method);
    println!(
        "Rows: {} synthesized, {} after filters",
        result.synthesized_rows,
        result.cohort.row_count()
    );
    println!("Plot: {} ({})", result.plot.kind, result.plot.fields().join(", "));
    if let Some(path) = &result.outputs.csv {
        println!("CSV: {}", path.display());
    }
    if let Some(path) = &result.outputs.vega_lite {
        println!("Vega-Lite: {}", path.display());
    }

    if preview > 0 {
        print_preview(&result.cohort, preview);
    }
    print_column_summaries(&result.summaries);
}

fn print_preview(cohort: &Cohort, limit: usize) {
    let names = cohort.column_names();
    let mut table = Table::new();
    table.set_header(names.iter().map(|name| header_cell(name)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in 0..cohort.row_count().min(limit) {
        table.add_row(
            names
                .iter()
                .map(|name| value_cell(cohort.value(row, name)))
                .collect::<Vec<_>>(),
        );
    }
    println!();
    println!("Preview:");
    println!("{table}");
}

fn print_column_summaries(summaries: &[ColumnSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Count"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Mean"),
        header_cell("Categories"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in summaries {
        let row = match summary {
            ColumnSummary::Numeric {
                name,
                count,
                min,
                max,
                mean,
            } => vec![
                Cell::new(name).add_attribute(Attribute::Bold),
                Cell::new(count),
                number_cell(*min),
                number_cell(*max),
                number_cell(*mean),
                dim_cell("-"),
            ],
            ColumnSummary::Categorical { name, counts } => {
                let total: usize = counts.iter().map(|(_, count)| count).sum();
                let breakdown = counts
                    .iter()
                    .map(|(category, count)| format!("{category}: {count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![
                    Cell::new(name).add_attribute(Attribute::Bold),
                    Cell::new(total),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    Cell::new(breakdown),
                ]
            }
        };
        table.add_row(row);
    }
    println!();
    println!("Summary:");
    println!("{table}");
}

fn domain_text(kind: &ColumnKind) -> String {
    match kind {
        ColumnKind::Numeric { min, max, decimals } => match decimals {
            Some(places) => format!("[{min}, {max}] ({places} dp)"),
            None => format!("[{min}, {max}]"),
        },
        ColumnKind::Categorical { categories } => categories.join(", "),
    }
}

fn filter_cell(filter: Option<&FilterValue>) -> Cell {
    match filter {
        Some(FilterValue::Range { low, high }) => Cell::new(format!("{low} to {high}")),
        Some(FilterValue::Set { selected }) if selected.is_empty() => {
            Cell::new("none selected").fg(Color::Yellow)
        }
        Some(FilterValue::Set { selected }) => Cell::new(
            selected.iter().cloned().collect::<Vec<_>>().join(", "),
        ),
        None => dim_cell("-"),
    }
}

fn value_cell(value: Option<CellValue>) -> Cell {
    match value {
        Some(CellValue::Number(v)) => Cell::new(v).set_alignment(CellAlignment::Right),
        Some(CellValue::Category(s)) => Cell::new(s),
        Some(CellValue::Missing) | None => dim_cell("-"),
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{v:.2}")),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
