//! Unit-of-measure option parser.

use std::collections::HashMap;

use dimclass_model::{DimType, ParseOutcome, ParsedFields, UnitFields};
use dimclass_standards::UnitTable;

use crate::dispatch::DimensionParser;
use crate::normalize::normalize;

/// Names under which INS publishes unit-of-measure dimensions.
const UNIT_DIMENSION_NAMES: &[&str] = &["unitati de masura", "unitate de masura"];

/// Strips a leading `um:` marker from a normalized label.
fn strip_unit_prefix(label: &str) -> &str {
    label
        .strip_prefix("um:")
        .map_or(label, str::trim_start)
}

pub struct UnitParser {
    entries: HashMap<String, UnitFields>,
}

impl UnitParser {
    /// Builds the lookup from a unit table, keyed by normalized label.
    pub fn new(table: &UnitTable) -> Self {
        let entries = table
            .iter()
            .map(|entry| {
                (
                    normalize(&entry.label),
                    UnitFields {
                        unit_type: entry.unit_type,
                        scale: entry.scale,
                        currency: entry.currency.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, normalized: &str) -> Option<&UnitFields> {
        let stripped = strip_unit_prefix(normalized);
        self.entries
            .get(stripped)
            .or_else(|| self.entries.get(normalized))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DimensionParser for UnitParser {
    fn dim_type(&self) -> DimType {
        DimType::Unit
    }

    fn description(&self) -> &'static str {
        "Unit of measure"
    }

    fn claims(&self, dimension_label: &str) -> bool {
        dimension_label.starts_with("um:")
            || dimension_label.starts_with("um ")
            || dimension_label == "um"
    }

    fn matches(&self, dimension_label: &str) -> bool {
        self.claims(dimension_label) || UNIT_DIMENSION_NAMES.contains(&dimension_label)
    }

    fn parse(&self, _raw: &str, normalized: &str) -> ParseOutcome {
        match self.lookup(normalized) {
            Some(fields) => ParseOutcome::matched(ParsedFields::Unit(fields.clone())),
            None => ParseOutcome::unmatched(DimType::Unit),
        }
    }
}
