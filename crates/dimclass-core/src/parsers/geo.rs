//! Geography option parser.
//!
//! Tiers are tried in order, the first match wins:
//!
//! 1. national totals
//! 2. `macroregiunea ...`
//! 3. `regiunea ...`
//! 4. county names, including the Bucharest municipality
//! 5. `<SIRUTA> <locality>` with a 4 to 6 digit code
//! 6. urban / rural residence text
//! 7. foreign countries, otherwise unknown

use std::collections::HashSet;
use std::sync::LazyLock;

use dimclass_model::{DimType, GeoFields, GeoLevel, ParseOutcome, ParsedFields};
use regex::Regex;

use super::contains_any;
use crate::dispatch::DimensionParser;
use crate::normalize::{contains_phrase, normalize};

const GEO_KEYWORDS: &[&str] = &[
    "macroregiuni",
    "regiuni",
    "judete",
    "judet",
    "localitati",
    "localitate",
    "municipii",
    "orase",
    "comune",
    "sate",
    "teritorii",
    "zone geografice",
    "tari",
    "tara",
    "continente",
];

const NATIONAL: &[&str] = &[
    "total",
    "romania",
    "nivel national",
    "total romania",
    "total general",
    "national",
];

/// Canonical display name of the capital.
pub const BUCHAREST: &str = "Municipiul București";

static SIRUTA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4,6})\s+(\S.*)$").expect("Invalid SIRUTA regex"));

pub struct GeoParser {
    counties: HashSet<String>,
    countries: HashSet<String>,
}

impl GeoParser {
    /// Builds the parser from county and country name lists (any casing).
    pub fn new<'a>(
        counties: impl IntoIterator<Item = &'a String>,
        countries: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        Self {
            counties: counties.into_iter().map(|name| normalize(name)).collect(),
            countries: countries.into_iter().map(|name| normalize(name)).collect(),
        }
    }

    fn parse_fields(&self, raw: &str, normalized: &str) -> Option<GeoFields> {
        if NATIONAL.contains(&normalized) {
            return Some(GeoFields::new(GeoLevel::National, "Total"));
        }
        if normalized.starts_with("macroregiunea") {
            return Some(GeoFields::new(GeoLevel::Macroregion, raw));
        }
        if normalized.starts_with("regiunea") {
            return Some(GeoFields::new(GeoLevel::Region, raw));
        }
        if self.counties.contains(normalized) {
            let name = if normalized.contains("bucuresti") {
                BUCHAREST
            } else {
                raw
            };
            return Some(GeoFields::new(GeoLevel::County, name));
        }
        if let Some(caps) = SIRUTA.captures(raw)
            && let Ok(code) = caps[1].parse::<u32>()
        {
            return Some(GeoFields {
                level: GeoLevel::Locality,
                siruta_code: Some(code),
                name_clean: Some(caps[2].trim().to_string()),
            });
        }
        if contains_phrase(normalized, "urban") {
            return Some(GeoFields::new(GeoLevel::Residence, "urban"));
        }
        if contains_phrase(normalized, "rural") {
            return Some(GeoFields::new(GeoLevel::Residence, "rural"));
        }
        if self.countries.contains(normalized) {
            return Some(GeoFields::new(GeoLevel::Country, raw));
        }
        None
    }
}

impl DimensionParser for GeoParser {
    fn dim_type(&self) -> DimType {
        DimType::Geo
    }

    fn description(&self) -> &'static str {
        "Territorial units"
    }

    fn matches(&self, dimension_label: &str) -> bool {
        contains_any(dimension_label, GEO_KEYWORDS)
    }

    fn parse(&self, raw: &str, normalized: &str) -> ParseOutcome {
        match self.parse_fields(raw, normalized) {
            Some(fields) => ParseOutcome::matched(ParsedFields::Geo(fields)),
            None => ParseOutcome::unmatched(DimType::Geo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> GeoParser {
        let counties: Vec<String> = ["Bihor", "Satu Mare", "Bucuresti", "Municipiul Bucuresti"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let countries = vec!["Franta".to_string(), "Germania".to_string()];
        GeoParser::new(&counties, &countries)
    }

    fn parse(label: &str) -> ParseOutcome {
        let raw = label.trim();
        parser().parse(raw, &normalize(raw))
    }

    fn geo(label: &str) -> GeoFields {
        match parse(label).fields {
            ParsedFields::Geo(fields) => fields,
            other => panic!("unexpected fields {other:?}"),
        }
    }

    #[test]
    fn test_national() {
        for label in ["Total", "ROMANIA", "Nivel national", "România"] {
            let fields = geo(label);
            assert_eq!(fields.level, GeoLevel::National, "label {label:?}");
            assert_eq!(fields.name_clean.as_deref(), Some("Total"));
        }
    }

    #[test]
    fn test_macroregion_keeps_original_label() {
        let fields = geo("MACROREGIUNEA UNU");
        assert_eq!(fields.level, GeoLevel::Macroregion);
        assert_eq!(fields.name_clean.as_deref(), Some("MACROREGIUNEA UNU"));
        assert_eq!(parse("MACROREGIUNEA UNU").confidence, 1.0);
    }

    #[test]
    fn test_region() {
        assert_eq!(geo("Regiunea NORD-VEST").level, GeoLevel::Region);
    }

    #[test]
    fn test_county_and_bucharest() {
        let fields = geo("Satu Mare");
        assert_eq!(fields.level, GeoLevel::County);
        assert_eq!(fields.name_clean.as_deref(), Some("Satu Mare"));

        for label in ["Bucuresti", "Municipiul Bucureşti", "MUNICIPIUL BUCURESTI"] {
            let fields = geo(label);
            assert_eq!(fields.level, GeoLevel::County, "label {label:?}");
            assert_eq!(fields.name_clean.as_deref(), Some(BUCHAREST));
        }
    }

    #[test]
    fn test_siruta_locality() {
        let fields = geo("1017 Municipiul Alba Iulia");
        assert_eq!(fields.level, GeoLevel::Locality);
        assert_eq!(fields.siruta_code, Some(1017));
        assert_eq!(fields.name_clean.as_deref(), Some("Municipiul Alba Iulia"));

        let fields = geo("179132 Comuna Cernica");
        assert_eq!(fields.siruta_code, Some(179_132));
    }

    #[test]
    fn test_residence_text_inside_geo() {
        assert_eq!(geo("Urban").level, GeoLevel::Residence);
        assert_eq!(geo("Total rural").name_clean.as_deref(), Some("rural"));
    }

    #[test]
    fn test_country_and_unknown() {
        let fields = geo("Franta");
        assert_eq!(fields.level, GeoLevel::Country);
        assert_eq!(parse("Franta").confidence, 1.0);

        let outcome = parse("Zona metropolitana");
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(geo("Zona metropolitana").level, GeoLevel::Unknown);
    }
}
