//! Reading `(dimension, option)` occurrences from a CSV export.
//!
//! Expected header (aliases in parentheses):
//!
//! ```text
//! option_id (nom_item_id), raw_label (option_label),
//! dimension_label (dim_label), matrix_code, dim_code
//! ```
//!
//! Rows are read as raw bytes so one badly encoded label does not abort the
//! file: the occurrence is kept with no label and later classified as
//! unmatched. Rows that cannot be keyed (bad option id, no matrix code) are
//! skipped and counted.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ByteRecord;
use dimclass_model::{DimensionDefinition, DimensionKey, OptionOccurrence};
use serde::Serialize;

use crate::error::IngestError;

const OPTION_ID: &[&str] = &["option_id", "nom_item_id"];
const RAW_LABEL: &[&str] = &["raw_label", "option_label"];
const DIMENSION_LABEL: &[&str] = &["dimension_label", "dim_label"];
const MATRIX_CODE: &[&str] = &["matrix_code"];
const DIM_CODE: &[&str] = &["dim_code"];

/// Counts of rows dropped during ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkippedRows {
    pub invalid_option_id: usize,
    pub missing_matrix_code: usize,
}

impl SkippedRows {
    pub fn total(&self) -> usize {
        self.invalid_option_id + self.missing_matrix_code
    }
}

/// Result of reading one input file.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub occurrences: Vec<OptionOccurrence>,
    pub rows_read: usize,
    pub skipped: SkippedRows,
    /// Occurrences kept with an undecodable label.
    pub malformed_labels: usize,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    option_id: usize,
    raw_label: usize,
    dimension_label: usize,
    matrix_code: usize,
    dim_code: Option<usize>,
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(alias))
    })
}

fn resolve_columns(headers: &ByteRecord, path: &Path) -> Result<Columns, IngestError> {
    let headers: Vec<String> = headers
        .iter()
        .map(|raw| {
            String::from_utf8_lossy(raw)
                .trim()
                .trim_matches('\u{feff}')
                .to_string()
        })
        .collect();
    let require = |aliases: &[&'static str]| {
        find_column(&headers, aliases).ok_or_else(|| IngestError::MissingColumn {
            column: aliases[0],
            path: path.to_path_buf(),
        })
    };
    Ok(Columns {
        option_id: require(OPTION_ID)?,
        raw_label: require(RAW_LABEL)?,
        dimension_label: require(DIMENSION_LABEL)?,
        matrix_code: require(MATRIX_CODE)?,
        dim_code: find_column(&headers, DIM_CODE),
    })
}

fn text(record: &ByteRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads occurrences from a CSV file.
pub fn read_occurrences(path: &Path) -> Result<IngestReport, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_occurrences_from(file, path)
}

/// Reads occurrences from any reader. `source` names the input in errors and logs.
pub fn read_occurrences_from<R: Read>(
    reader: R,
    source: &Path,
) -> Result<IngestReport, IngestError> {
    let csv_error = |e: csv::Error| IngestError::Csv {
        path: source.to_path_buf(),
        source: e,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = resolve_columns(reader.byte_headers().map_err(csv_error)?, source)?;

    let mut report = IngestReport::default();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(csv_error)? {
        report.rows_read += 1;
        let line = record.position().map_or(0, csv::Position::line);

        let option_id = text(&record, columns.option_id).and_then(|v| v.parse::<u64>().ok());
        let Some(option_id) = option_id else {
            report.skipped.invalid_option_id += 1;
            tracing::debug!(line, "skipping row without a numeric option id");
            continue;
        };
        let Some(matrix_code) = text(&record, columns.matrix_code) else {
            report.skipped.missing_matrix_code += 1;
            tracing::debug!(line, option_id, "skipping row without a matrix code");
            continue;
        };
        let dimension_label = text(&record, columns.dimension_label).unwrap_or_default();
        let dim_code = columns
            .dim_code
            .and_then(|idx| text(&record, idx))
            .unwrap_or_else(|| dimension_label.clone());

        let raw_bytes = record.get(columns.raw_label).unwrap_or_default();
        let raw_label = match std::str::from_utf8(raw_bytes) {
            Ok(label) => Some(label.to_string()),
            Err(_) => {
                report.malformed_labels += 1;
                tracing::warn!(
                    line,
                    option_id,
                    matrix = %matrix_code,
                    "option label is not valid UTF-8"
                );
                None
            }
        };

        report.occurrences.push(OptionOccurrence {
            option_id,
            raw_label,
            dimension: DimensionDefinition {
                key: DimensionKey::new(matrix_code, dim_code),
                label: dimension_label,
            },
        });
    }

    tracing::info!(
        path = %source.display(),
        rows = report.rows_read,
        occurrences = report.occurrences.len(),
        skipped = report.skipped.total(),
        malformed = report.malformed_labels,
        "input loaded"
    );
    Ok(report)
}
