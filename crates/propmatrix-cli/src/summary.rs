//! Table rendering for command reports.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use propmatrix_model::{FieldDescriptor, PropValue};

use crate::commands::{InspectReport, LayoutReport, MatrixReport};

pub fn print_inspect(report: &InspectReport) {
    println!("Schema layout: {}", report.layout.as_str());
    println!(
        "Controls: {} ({} dimensions)",
        report.controls.len(),
        report.dimensions.len()
    );
    println!("{}", controls_table(report));
}

pub fn controls_table(report: &InspectReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Control"),
        header_cell("Default"),
        header_cell("Values"),
        header_cell("Dimension"),
        header_cell("Description"),
    ]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Center);
    for control in &report.controls {
        let dimension = if report.is_dimension(&control.name) {
            Cell::new("yes").fg(Color::Green)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(&control.name).add_attribute(Attribute::Bold),
            Cell::new(&control.label),
            Cell::new(control.control.as_str()),
            default_cell(control),
            values_cell(control),
            dimension,
            control
                .description
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    table
}

pub fn print_matrix(report: &MatrixReport) {
    println!("{}", report.header.title);
    println!(
        "Showing {} of {} generated combinations",
        report.header.shown, report.header.generated
    );
    if let Some(notice) = &report.header.truncation_notice {
        eprintln!("{notice}");
    }
    println!("{}", matrix_table(report));
}

pub fn matrix_table(report: &MatrixReport) -> Table {
    let mut header = vec![header_cell("#")];
    header.extend(
        report
            .dimensions
            .iter()
            .map(|dimension| header_cell(&dimension.label)),
    );
    header.push(header_cell("Label"));

    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in &report.combinations {
        let mut cells = vec![dim_cell(row.ordinal)];
        cells.extend(report.dimensions.iter().map(|dimension| {
            row.props
                .get(&dimension.name)
                .and_then(|value| PropValue::try_from(value).ok())
                .map_or_else(|| dim_cell("-"), |value| value_cell(&value))
        }));
        cells.push(Cell::new(&row.label));
        table.add_row(cells);
    }
    table
}

pub fn print_layout(report: &LayoutReport) {
    println!("{}", layout_table(report));
}

pub fn layout_table(report: &LayoutReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows: [(&str, String); 6] = [
        ("Columns", report.columns.to_string()),
        ("Rows", report.rows.to_string()),
        ("Row height", report.row_height.to_string()),
        ("Total height", report.total_height.to_string()),
        ("Visible rows", format_range(&report.visible_rows)),
        ("Visible items", format_range(&report.visible_items)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value)]);
    }
    table
}

fn format_range(range: &std::ops::Range<usize>) -> String {
    if range.is_empty() {
        "-".to_string()
    } else {
        format!("{}..{}", range.start, range.end)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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

fn value_cell(value: &PropValue) -> Cell {
    match value {
        PropValue::Bool(true) => Cell::new("true").fg(Color::Green),
        PropValue::Bool(false) => Cell::new("false").fg(Color::Red),
        PropValue::Null => dim_cell("null"),
        other => Cell::new(other),
    }
}

fn default_cell(control: &FieldDescriptor) -> Cell {
    match &control.default_value {
        Some(value) if control.declared_default => value_cell(value),
        Some(value) => dim_cell(format!("{value} (implied)")),
        None => dim_cell("-"),
    }
}

fn values_cell(control: &FieldDescriptor) -> Cell {
    if control.values.is_empty() {
        return dim_cell("-");
    }
    let values: Vec<String> = control.values.iter().map(ToString::to_string).collect();
    Cell::new(values.join(" | "))
}
