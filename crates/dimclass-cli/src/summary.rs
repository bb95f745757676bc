use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dimclass_cli::run::RunReport;
use dimclass_core::{DimensionTrace, LabelCount, TOP_UNKNOWN_GEO, TOP_UNKNOWN_UNITS};
use dimclass_model::{ClassifiedOption, DimType, ParsedFields};

use crate::cli::RunArgs;

pub fn print_summary(report: &RunReport, args: &RunArgs) {
    let summary = &report.output.summary;
    println!("Input: {}", args.input.display());
    match &report.committed {
        Some(committed) => {
            println!("Output: {}", args.output_dir.display());
            println!("  {}", committed.classified_options.display());
            println!("  {}", committed.dataset_profiles.display());
            println!("  {}", committed.manifest.display());
        }
        None if report.manifest.matrix.is_some() => {
            println!("Output: none (restricted to one matrix)")
        }
        None => println!("Output: none (dry run)"),
    }
    println!(
        "Rows: {} read, {} skipped ({} invalid option id, {} missing matrix code), {} malformed labels",
        report.rows_read,
        report.skipped.total(),
        report.skipped.invalid_option_id,
        report.skipped.missing_matrix_code,
        summary.malformed_labels,
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dimension type"),
        header_cell("Options"),
        header_cell("Unmatched"),
        header_cell("Unmatched %"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for dim_type in DimType::ALL {
        let counts = summary.by_dim_type.get(&dim_type).copied().unwrap_or_default();
        table.add_row(vec![
            type_cell(dim_type.as_str()),
            Cell::new(counts.options),
            count_cell(counts.unmatched, Color::Yellow),
            percent_cell(counts.unmatched_fraction(), counts.options),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.distinct_options).add_attribute(Attribute::Bold),
        count_cell(summary.unmatched_total(), Color::Yellow).add_attribute(Attribute::Bold),
        percent_cell(
            fraction(summary.unmatched_total(), summary.distinct_options),
            summary.distinct_options,
        ),
    ]);
    println!("{table}");

    let mut archetypes = Table::new();
    archetypes.set_header(vec![header_cell("Archetype"), header_cell("Datasets")]);
    apply_table_style(&mut archetypes);
    align_column(&mut archetypes, 1, CellAlignment::Right);
    for (archetype, count) in &summary.archetypes {
        archetypes.add_row(vec![type_cell(archetype.as_str()), Cell::new(*count)]);
    }
    println!();
    println!("Datasets: {}", summary.datasets);
    println!("{archetypes}");
    if summary.datasets_mixing_units > 0 {
        println!(
            "{} datasets mix unit types; their values must not be summed across units",
            summary.datasets_mixing_units
        );
    }
    if summary.residence_overlaps > 0 {
        println!(
            "{} datasets carry urban/rural options in both a geography and a residence dimension",
            summary.residence_overlaps
        );
    }

    print_label_table(
        "Unknown unit labels",
        &summary.top_unknown_units,
        summary.unknown_unit_labels,
        TOP_UNKNOWN_UNITS,
    );
    print_label_table(
        "Unknown geography labels",
        &summary.top_unknown_geo,
        summary.unknown_geo_labels,
        TOP_UNKNOWN_GEO,
    );

    let cache = summary.cache;
    println!();
    println!(
        "Cache: {} occurrences, {} hits, {} misses, {} parser calls, {} type conflicts",
        summary.occurrences, cache.hits, cache.misses, cache.parser_invocations, cache.conflicts
    );
    println!("Vocabulary: {}", report.manifest.vocabulary_sha256);
}

fn print_label_table(title: &str, labels: &[LabelCount], distinct: usize, limit: usize) {
    if labels.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Label"), header_cell("Options")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for label in labels {
        table.add_row(vec![Cell::new(&label.label), Cell::new(label.count)]);
    }
    println!();
    if distinct > limit {
        println!("{title} (top {limit} of {distinct}):");
    } else {
        println!("{title}:");
    }
    println!("{table}");
}

/// Prints the per-dimension dispatch decision and every parsed option.
pub fn print_trace(traces: &[DimensionTrace]) {
    if traces.is_empty() {
        println!("No dimensions matched the requested dataset.");
        return;
    }
    for trace in traces {
        println!();
        println!(
            "{} / {}  \"{}\"  -> {} ({}{})",
            trace.key.matrix_code,
            trace.key.dim_code,
            trace.label,
            trace.dispatch.dim_type,
            trace.dispatch.parser,
            if trace.dispatch.fallback { ", fallback" } else { "" }
        );
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Option"),
            header_cell("Label"),
            header_cell("Confidence"),
            header_cell("Fields"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        for option in &trace.options {
            table.add_row(vec![
                Cell::new(option.option_id),
                label_cell(option),
                confidence_cell(option.parse_confidence),
                Cell::new(describe_fields(&option.fields)),
            ]);
        }
        println!("{table}");
    }
}

/// Compact `key=value` rendering of the non-empty parsed fields.
fn describe_fields(fields: &ParsedFields) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut push = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            parts.push(format!("{key}={value}"));
        }
    };
    match fields {
        ParsedFields::Time(time) => {
            push("year", time.year.map(|v| v.to_string()));
            push("quarter", time.quarter.map(|v| v.to_string()));
            push("semester", time.semester.map(|v| v.to_string()));
            push("month", time.month.map(|v| v.to_string()));
            push("granularity", Some(time.granularity.to_string()));
        }
        ParsedFields::Geo(geo) => {
            push("level", Some(geo.level.to_string()));
            push("siruta", geo.siruta_code.map(|v| v.to_string()));
            push("name", geo.name_clean.clone());
        }
        ParsedFields::Gender(gender) => push("gender", gender.gender.map(|g| g.to_string())),
        ParsedFields::Age(age) => {
            push("min", age.min.map(|v| v.to_string()));
            push("max", age.max.map(|v| v.to_string()));
        }
        ParsedFields::Residence(residence) => {
            push("area", residence.area.map(|a| a.to_string()));
        }
        ParsedFields::Unit(unit) => {
            push("type", Some(unit.unit_type.to_string()));
            push("scale", Some(unit.scale.to_string()));
            push("currency", unit.currency.clone());
        }
        ParsedFields::Indicator => {}
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn type_cell(token: &str) -> Cell {
    Cell::new(token)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn percent_cell(value: f64, total: usize) -> Cell {
    if total == 0 {
        dim_cell("-")
    } else {
        Cell::new(format!("{:.1}%", value * 100.0))
    }
}

fn confidence_cell(confidence: f64) -> Cell {
    let cell = Cell::new(format!("{confidence:.2}"));
    if confidence > 0.0 {
        cell.fg(Color::Green)
    } else {
        cell.fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn label_cell(option: &ClassifiedOption) -> Cell {
    match &option.raw_label {
        Some(label) => Cell::new(label),
        None => dim_cell("<malformed>"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
