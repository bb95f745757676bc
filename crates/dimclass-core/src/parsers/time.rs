//! Time option parser.

use std::sync::LazyLock;

use dimclass_model::{DimType, ParseOutcome, ParsedFields, TimeFields};
use regex::Regex;

use super::contains_any;
use crate::dispatch::DimensionParser;
use crate::normalize::has_word_starting_with;

/// Labels that name a time axis only when they are the whole label.
const EXACT_TIME_LABELS: &[&str] = &["luni"];

const TIME_KEYWORDS: &[&str] = &[
    "perioade",
    "perioade de referinta",
    "trimestre",
    "trimestru",
    "semestre",
    "semestru",
    "luni calendaristice",
    "saptamani",
    "ani",
];

static ANNUAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^anul (\d{4})\b").expect("Invalid annual regex"));

static QUARTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^trimestrul (iv|iii|ii|i|[1-4]) (\d{4})\b").expect("Invalid quarter regex")
});

static SEMESTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^semestrul (ii|i|[12]) (\d{4})\b").expect("Invalid semester regex")
});

static MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^luna ([a-z]+\.?|\d{1,2}) (\d{4})\b").expect("Invalid month regex")
});

static BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})$").expect("Invalid year regex"));

/// Converts a roman numeral up to IV.
pub fn roman_to_number(token: &str) -> Option<u8> {
    match token {
        "i" => Some(1),
        "ii" => Some(2),
        "iii" => Some(3),
        "iv" => Some(4),
        _ => None,
    }
}

/// Romanian month name or abbreviation (normalized) to 1–12.
pub fn month_number(token: &str) -> Option<u8> {
    let month = match token.trim_end_matches('.') {
        "ianuarie" | "ian" => 1,
        "februarie" | "feb" => 2,
        "martie" | "mar" => 3,
        "aprilie" | "apr" => 4,
        "mai" => 5,
        "iunie" | "iun" => 6,
        "iulie" | "iul" => 7,
        "august" | "aug" => 8,
        "septembrie" | "sep" | "sept" => 9,
        "octombrie" | "oct" => 10,
        "noiembrie" | "nov" => 11,
        "decembrie" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Roman (`iv`) or arabic (`4`) ordinal, capped at `max`.
fn ordinal(token: &str, max: u8) -> Option<u8> {
    roman_to_number(token)
        .or_else(|| token.parse::<u8>().ok())
        .filter(|n| (1..=max).contains(n))
}

fn year(token: &str) -> Option<i32> {
    token.parse().ok()
}

pub struct TimeParser;

impl TimeParser {
    fn parse_fields(label: &str) -> Option<TimeFields> {
        if let Some(caps) = ANNUAL.captures(label) {
            return Some(TimeFields::annual(year(&caps[1])?));
        }
        if let Some(caps) = QUARTER.captures(label) {
            return Some(TimeFields::quarterly(
                year(&caps[2])?,
                ordinal(&caps[1], 4)?,
            ));
        }
        if let Some(caps) = SEMESTER.captures(label) {
            return Some(TimeFields::semester(
                year(&caps[2])?,
                ordinal(&caps[1], 2)?,
            ));
        }
        if let Some(caps) = MONTH.captures(label) {
            let token = &caps[1];
            let month = month_number(token).or_else(|| ordinal(token, 12))?;
            return Some(TimeFields::monthly(year(&caps[2])?, month));
        }
        if let Some(caps) = BARE_YEAR.captures(label) {
            return Some(TimeFields::annual(year(&caps[1])?));
        }
        None
    }
}

impl DimensionParser for TimeParser {
    fn dim_type(&self) -> DimType {
        DimType::Time
    }

    fn description(&self) -> &'static str {
        "Time periods"
    }

    fn matches(&self, dimension_label: &str) -> bool {
        if EXACT_TIME_LABELS.contains(&dimension_label) {
            return true;
        }
        if !contains_any(dimension_label, TIME_KEYWORDS) {
            return false;
        }
        // "ani" also names age units ("Varste (ani)").
        let only_ani = !contains_any(
            dimension_label,
            &TIME_KEYWORDS[..TIME_KEYWORDS.len() - 1],
        );
        !(only_ani && has_word_starting_with(dimension_label, "varst"))
    }

    fn parse(&self, _raw: &str, normalized: &str) -> ParseOutcome {
        match Self::parse_fields(normalized) {
            Some(fields) => ParseOutcome::matched(ParsedFields::Time(fields)),
            None => ParseOutcome::unmatched(DimType::Time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimclass_model::TimeGranularity;

    fn parse(label: &str) -> ParseOutcome {
        TimeParser.parse(label, &crate::normalize(label))
    }

    fn fields(label: &str) -> TimeFields {
        match parse(label).fields {
            ParsedFields::Time(fields) => fields,
            other => panic!("unexpected fields {other:?}"),
        }
    }

    #[test]
    fn test_annual() {
        assert_eq!(fields("Anul 2009"), TimeFields::annual(2009));
        assert_eq!(fields("2015"), TimeFields::annual(2015));
        assert_eq!(parse("Anul 2009").confidence, 1.0);
    }

    #[test]
    fn test_quarter_roman_and_arabic() {
        assert_eq!(fields("Trimestrul IV 2020"), TimeFields::quarterly(2020, 4));
        assert_eq!(fields("Trimestrul 2 2018"), TimeFields::quarterly(2018, 2));
        assert_eq!(fields("trimestrul iii 1999"), TimeFields::quarterly(1999, 3));
    }

    #[test]
    fn test_semester() {
        assert_eq!(fields("Semestrul II 2021"), TimeFields::semester(2021, 2));
        assert_eq!(fields("Semestrul 1 2021"), TimeFields::semester(2021, 1));
    }

    #[test]
    fn test_month_names_numbers_and_abbreviations() {
        assert_eq!(fields("Luna Ianuarie 2022"), TimeFields::monthly(2022, 1));
        assert_eq!(fields("Luna sept. 2019"), TimeFields::monthly(2019, 9));
        assert_eq!(fields("Luna 12 2010"), TimeFields::monthly(2010, 12));
        assert_eq!(fields("luna mai 2005"), TimeFields::monthly(2005, 5));
    }

    #[test]
    fn test_unmatched() {
        for label in ["Luna 13 2010", "Trimestrul V 2020", "1990-1995", "Total", ""] {
            let outcome = parse(label);
            assert_eq!(outcome.confidence, 0.0, "label {label:?}");
            let fields = fields(label);
            assert_eq!(fields.granularity, TimeGranularity::Other);
            assert!(fields.year.is_none());
        }
    }

    #[test]
    fn test_dimension_keywords() {
        assert!(TimeParser.matches("perioade"));
        assert!(TimeParser.matches("ani"));
        assert!(TimeParser.matches("luni"));
        assert!(!TimeParser.matches("durata somajului in luni"));
        assert!(!TimeParser.matches("varste (ani)"));
        assert!(!TimeParser.matches("grupe de varsta in ani"));
        assert!(!TimeParser.matches("companii"));
    }
}
