//! Residence (urban / rural) option parser.

use dimclass_model::{DimType, ParseOutcome, ParsedFields, ResidenceArea, ResidenceFields};

use super::contains_any;
use crate::dispatch::DimensionParser;

const RESIDENCE_KEYWORDS: &[&str] = &[
    "medii de rezidenta",
    "mediu de rezidenta",
    "rezidenta",
    "grad de urbanizare",
    "urban",
    "rural",
];

pub struct ResidenceParser;

impl DimensionParser for ResidenceParser {
    fn dim_type(&self) -> DimType {
        DimType::Residence
    }

    fn description(&self) -> &'static str {
        "Residence area"
    }

    fn matches(&self, dimension_label: &str) -> bool {
        contains_any(dimension_label, RESIDENCE_KEYWORDS)
    }

    fn parse(&self, _raw: &str, normalized: &str) -> ParseOutcome {
        let area = match normalized {
            "urban" | "mediul urban" => ResidenceArea::Urban,
            "rural" | "mediul rural" => ResidenceArea::Rural,
            "total" => ResidenceArea::Total,
            _ => return ParseOutcome::unmatched(DimType::Residence),
        };
        ParseOutcome::matched(ParsedFields::Residence(ResidenceFields { area: Some(area) }))
    }
}
