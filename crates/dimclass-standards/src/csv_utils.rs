//! Shared CSV helpers for vocabulary tables.

use std::path::Path;

use crate::error::StandardsError;

/// Opens a CSV reader over in-memory bytes, tolerating a UTF-8 BOM.
pub(crate) fn reader_for(bytes: &[u8]) -> csv::Reader<&[u8]> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes)
}

pub(crate) fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

pub(crate) fn require_column(
    headers: &csv::StringRecord,
    name: &str,
    path: &Path,
) -> Result<usize, StandardsError> {
    header_index(headers, name).ok_or_else(|| StandardsError::MissingColumn {
        column: name.to_string(),
        path: path.to_path_buf(),
    })
}

pub(crate) fn get_string(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn row_line(row: &csv::StringRecord) -> u64 {
    row.position().map_or(0, csv::Position::line)
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, StandardsError> {
    std::fs::read(path).map_err(|e| StandardsError::io(path, e))
}
