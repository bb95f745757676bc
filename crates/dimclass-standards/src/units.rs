//! Unit-of-measure lookup table.
//!
//! The table maps a unit label to `(unit_type, unit_scale, currency)`. It is
//! data, not code: the default rows live in `standards/units.csv` and further
//! CSV files with the same columns can be layered on top at run time.
//!
//! ```text
//! label,unit_type,unit_scale,currency
//! mii lei,currency,1000,RON
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use dimclass_model::UnitType;

use crate::csv_utils::{get_string, read_file, reader_for, require_column, row_line};
use crate::error::StandardsError;

/// One row of the unit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitEntry {
    pub label: String,
    pub unit_type: UnitType,
    pub scale: u64,
    pub currency: Option<String>,
}

/// Unit rows keyed by lowercase label. Later inserts replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitTable {
    entries: BTreeMap<String, UnitEntry>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a row, returning the replaced row.
    pub fn insert(&mut self, entry: UnitEntry) -> Option<UnitEntry> {
        let key = entry.label.trim().to_lowercase();
        self.entries.insert(key, entry)
    }

    pub fn get(&self, label: &str) -> Option<&UnitEntry> {
        self.entries.get(&label.trim().to_lowercase())
    }

    /// Layers `other` on top of this table.
    pub fn extend(&mut self, other: UnitTable) {
        for (_, entry) in other.entries {
            if let Some(previous) = self.insert(entry.clone()) {
                if previous != entry {
                    tracing::debug!(label = %entry.label, "unit table row overridden");
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses unit rows from CSV bytes. `source` is only used in error messages.
pub fn parse_unit_table(bytes: &[u8], source: &Path) -> Result<UnitTable, StandardsError> {
    let mut reader = reader_for(bytes);
    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(source, &e))?
        .clone();

    let idx_label = require_column(&headers, "label", source)?;
    let idx_type = require_column(&headers, "unit_type", source)?;
    let idx_scale = require_column(&headers, "unit_scale", source)?;
    let idx_currency = require_column(&headers, "currency", source)?;

    let mut table = UnitTable::new();
    for row in reader.records() {
        let row = row.map_err(|e| StandardsError::csv(source, &e))?;
        let invalid = |message: String| StandardsError::InvalidRow {
            path: source.to_path_buf(),
            line: row_line(&row),
            message,
        };

        let Some(label) = get_string(&row, Some(idx_label)) else {
            continue;
        };
        let unit_type = get_string(&row, Some(idx_type))
            .ok_or_else(|| invalid(format!("missing unit_type for '{label}'")))?
            .parse::<UnitType>()
            .map_err(invalid)?;
        let scale = match get_string(&row, Some(idx_scale)) {
            Some(raw) => parse_scale(&raw)
                .ok_or_else(|| invalid(format!("invalid unit_scale '{raw}' for '{label}'")))?,
            None => 1,
        };
        let currency = get_string(&row, Some(idx_currency)).map(|c| c.to_uppercase());

        table.insert(UnitEntry {
            label,
            unit_type,
            scale,
            currency,
        });
    }
    Ok(table)
}

/// Loads a unit table from a CSV file.
pub fn load_unit_table(path: &Path) -> Result<UnitTable, StandardsError> {
    let bytes = read_file(path)?;
    parse_unit_table(&bytes, path)
}

fn parse_scale(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| *c != '_' && *c != ',').collect();
    digits.parse::<u64>().ok().filter(|scale| *scale > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "label,unit_type,unit_scale,currency\n\
                          Mii lei,currency,1000,ron\n\
                          procente,percentage,1,\n";

    #[test]
    fn test_parse_unit_rows() {
        let table = parse_unit_table(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();
        assert_eq!(table.len(), 2);
        let entry = table.get("mii lei").unwrap();
        assert_eq!(entry.unit_type, UnitType::Currency);
        assert_eq!(entry.scale, 1000);
        assert_eq!(entry.currency.as_deref(), Some("RON"));
        assert!(table.get("PROCENTE").unwrap().currency.is_none());
    }

    #[test]
    fn test_invalid_unit_type_is_reported_with_line() {
        let csv = "label,unit_type,unit_scale,currency\nfoo,volume,1,\n";
        let err = parse_unit_table(csv.as_bytes(), Path::new("bad.csv")).unwrap_err();
        match err {
            StandardsError::InvalidRow { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let csv = "label,unit_type\nfoo,count\n";
        let err = parse_unit_table(csv.as_bytes(), Path::new("bad.csv")).unwrap_err();
        assert!(matches!(err, StandardsError::MissingColumn { .. }));
    }

    #[test]
    fn test_extend_overrides_rows() {
        let mut base = parse_unit_table(SAMPLE.as_bytes(), Path::new("a.csv")).unwrap();
        let extra = parse_unit_table(
            "label,unit_type,unit_scale,currency\nprocente,rate,1,\nbuc,count,1,\n".as_bytes(),
            Path::new("b.csv"),
        )
        .unwrap();
        base.extend(extra);
        assert_eq!(base.len(), 3);
        assert_eq!(base.get("procente").unwrap().unit_type, UnitType::Rate);
    }

    #[test]
    fn test_scale_separators() {
        assert_eq!(parse_scale("1_000_000"), Some(1_000_000));
        assert_eq!(parse_scale("1,000"), Some(1000));
        assert_eq!(parse_scale("0"), None);
        assert_eq!(parse_scale("mii"), None);
    }
}
