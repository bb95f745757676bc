//! Fallback parser for generic categorical axes.

use dimclass_model::{DimType, ParseOutcome, ParsedFields};

use crate::dispatch::DimensionParser;

/// Indicator options carry no structured fields and are always covered.
pub struct IndicatorParser;

impl DimensionParser for IndicatorParser {
    fn dim_type(&self) -> DimType {
        DimType::Indicator
    }

    fn description(&self) -> &'static str {
        "Categorical axis (unparsed)"
    }

    fn matches(&self, _dimension_label: &str) -> bool {
        false
    }

    fn parse(&self, _raw: &str, _normalized: &str) -> ParseOutcome {
        ParseOutcome::matched(ParsedFields::Indicator)
    }
}
