//! Gender option parser.

use dimclass_model::{DimType, Gender, GenderFields, ParseOutcome, ParsedFields};

use super::contains_any;
use crate::dispatch::DimensionParser;

const GENDER_KEYWORDS: &[&str] = &["sex", "sexe", "sexul"];

/// Mentions of a residence axis that move a mixed label to residence.
const RESIDENCE_HINTS: &[&str] = &["rezidenta", "medii", "mediu"];

fn lookup(label: &str) -> Option<Gender> {
    let gender = match label {
        "masculin" | "barbati" | "baieti" | "barbat" | "baiat" | "de sex masculin" => Gender::Male,
        "feminin" | "femei" | "fete" | "femeie" | "fata" | "de sex feminin" => Gender::Female,
        "total" | "ambele sexe" => Gender::Total,
        "sex necunoscut" | "necunoscut" => Gender::Unknown,
        _ => return None,
    };
    Some(gender)
}

pub struct GenderParser;

impl DimensionParser for GenderParser {
    fn dim_type(&self) -> DimType {
        DimType::Gender
    }

    fn description(&self) -> &'static str {
        "Sex breakdown"
    }

    fn matches(&self, dimension_label: &str) -> bool {
        contains_any(dimension_label, GENDER_KEYWORDS)
            && !contains_any(dimension_label, RESIDENCE_HINTS)
    }

    fn parse(&self, _raw: &str, normalized: &str) -> ParseOutcome {
        match lookup(normalized) {
            Some(gender) => ParseOutcome::matched(ParsedFields::Gender(GenderFields {
                gender: Some(gender),
            })),
            None => ParseOutcome::unmatched(DimType::Gender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender(label: &str) -> Option<Gender> {
        match GenderParser.parse(label, &crate::normalize(label)).fields {
            ParsedFields::Gender(fields) => fields.gender,
            other => panic!("unexpected fields {other:?}"),
        }
    }

    #[test]
    fn test_values() {
        assert_eq!(gender("Masculin"), Some(Gender::Male));
        assert_eq!(gender("Bărbați"), Some(Gender::Male));
        assert_eq!(gender("FEMEI"), Some(Gender::Female));
        assert_eq!(gender("Ambele sexe"), Some(Gender::Total));
        assert_eq!(gender("Sex necunoscut"), Some(Gender::Unknown));
    }

    #[test]
    fn test_unknown_value_is_a_match() {
        let outcome = GenderParser.parse("Sex necunoscut", "sex necunoscut");
        assert!(outcome.is_matched());
    }

    #[test]
    fn test_no_substring_matching() {
        let outcome = GenderParser.parse("Femei casnice", "femei casnice");
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(gender("Femei casnice"), None);
    }
}
