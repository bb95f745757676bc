//! Age option parser.

use std::sync::LazyLock;

use dimclass_model::{AGE_OPEN_UPPER, AgeFields, DimType, ParseOutcome, ParsedFields};
use regex::Regex;

use super::contains_any;
use crate::dispatch::DimensionParser;
use crate::normalize::has_word_starting_with;

const AGE_KEYWORDS: &[&str] = &["grupe de varsta", "grupe varsta", "clase de varsta"];

const TOTAL: &[&str] = &["total", "total varste", "toate varstele"];

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}) ?- ?(\d{1,3}) ani$").expect("Invalid age range regex")
});

static AND_OVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}) ani? (?:si )?(?:peste|mai mult)$").expect("Invalid open age regex")
});

static UNDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sub (\d{1,3}) ani?$").expect("Invalid under-age regex"));

static OVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^peste (\d{1,3}) ani?$").expect("Invalid over-age regex"));

static SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}) ani?$").expect("Invalid single age regex"));

fn capture(re: &Regex, label: &str, group: usize) -> Option<u16> {
    re.captures(label)
        .and_then(|caps| caps.get(group))
        .and_then(|m| m.as_str().parse().ok())
}

pub struct AgeParser;

impl AgeParser {
    fn parse_fields(label: &str) -> Option<AgeFields> {
        if TOTAL.contains(&label) {
            return Some(AgeFields::range(0, AGE_OPEN_UPPER));
        }
        if let Some(caps) = RANGE.captures(label) {
            let min: u16 = caps[1].parse().ok()?;
            let max: u16 = caps[2].parse().ok()?;
            return (min <= max).then(|| AgeFields::range(min, max));
        }
        if let Some(n) = capture(&AND_OVER, label, 1) {
            return Some(AgeFields::range(n, AGE_OPEN_UPPER));
        }
        if let Some(n) = capture(&UNDER, label, 1) {
            return n.checked_sub(1).map(|max| AgeFields::range(0, max));
        }
        if let Some(n) = capture(&OVER, label, 1) {
            return Some(AgeFields::range(n + 1, AGE_OPEN_UPPER));
        }
        capture(&SINGLE, label, 1).map(|n| AgeFields::range(n, n))
    }
}

impl DimensionParser for AgeParser {
    fn dim_type(&self) -> DimType {
        DimType::Age
    }

    fn description(&self) -> &'static str {
        "Ages and age groups"
    }

    fn matches(&self, dimension_label: &str) -> bool {
        contains_any(dimension_label, AGE_KEYWORDS)
            || has_word_starting_with(dimension_label, "varst")
    }

    fn parse(&self, _raw: &str, normalized: &str) -> ParseOutcome {
        match Self::parse_fields(normalized) {
            Some(fields) => ParseOutcome::matched(ParsedFields::Age(fields)),
            None => ParseOutcome::unmatched(DimType::Age),
        }
    }
}
