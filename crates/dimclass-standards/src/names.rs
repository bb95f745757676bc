//! Closed name lists (counties, foreign countries).

use std::collections::BTreeSet;
use std::path::Path;

use crate::csv_utils::{get_string, read_file, reader_for, require_column};
use crate::error::StandardsError;

/// Parses a single-column `name` list. Names are lowercased and trimmed.
pub fn parse_name_list(bytes: &[u8], source: &Path) -> Result<BTreeSet<String>, StandardsError> {
    let mut reader = reader_for(bytes);
    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(source, &e))?
        .clone();
    let idx_name = require_column(&headers, "name", source)?;

    let mut names = BTreeSet::new();
    for row in reader.records() {
        let row = row.map_err(|e| StandardsError::csv(source, &e))?;
        if let Some(name) = get_string(&row, Some(idx_name)) {
            names.insert(name.to_lowercase());
        }
    }
    Ok(names)
}

pub fn load_name_list(path: &Path) -> Result<BTreeSet<String>, StandardsError> {
    let bytes = read_file(path)?;
    parse_name_list(&bytes, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_lowercased_and_blank_rows_skipped() {
        let csv = "name\nSatu Mare\n\n  Olt  \n";
        let names = parse_name_list(csv.as_bytes(), Path::new("c.csv")).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("satu mare"));
        assert!(names.contains("olt"));
    }
}
