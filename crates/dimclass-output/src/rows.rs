//! Persisted shapes of the Dataset Profiles relation.

use dimclass_model::DatasetProfile;
use serde::Serialize;

/// Rounds a coverage fraction to three decimals.
pub fn round_coverage(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Column order of [`ProfileRow`].
pub const PROFILE_COLUMNS: &[&str] = &[
    "matrix_code",
    "has_time",
    "time_granularity",
    "time_year_min",
    "time_year_max",
    "has_geo",
    "geo_levels",
    "has_gender",
    "has_age",
    "has_residence",
    "unit_types",
    "primary_unit_type",
    "dim_count",
    "archetype",
    "parse_coverage",
];

/// Flat CSV row. List-valued columns are JSON array strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    pub matrix_code: String,
    pub has_time: bool,
    pub time_granularity: Option<&'static str>,
    pub time_year_min: Option<i32>,
    pub time_year_max: Option<i32>,
    pub has_geo: bool,
    pub geo_levels: String,
    pub has_gender: bool,
    pub has_age: bool,
    pub has_residence: bool,
    pub unit_types: String,
    pub primary_unit_type: Option<&'static str>,
    pub dim_count: usize,
    pub archetype: &'static str,
    pub parse_coverage: f64,
}

impl From<&DatasetProfile> for ProfileRow {
    fn from(profile: &DatasetProfile) -> Self {
        Self {
            matrix_code: profile.matrix_code.clone(),
            has_time: profile.has_time,
            time_granularity: profile.time_granularity.map(|g| g.as_str()),
            time_year_min: profile.time_year_min,
            time_year_max: profile.time_year_max,
            has_geo: profile.has_geo,
            geo_levels: json_array(&profile.geo_level_tokens()),
            has_gender: profile.has_gender,
            has_age: profile.has_age,
            has_residence: profile.has_residence,
            unit_types: json_array(&profile.unit_type_tokens()),
            primary_unit_type: profile.primary_unit_type.map(|u| u.as_str()),
            dim_count: profile.dim_count,
            archetype: profile.archetype.as_str(),
            parse_coverage: round_coverage(profile.parse_coverage),
        }
    }
}

/// JSON record: same columns, lists kept as arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
    pub matrix_code: String,
    pub has_time: bool,
    pub time_granularity: Option<&'static str>,
    pub time_year_min: Option<i32>,
    pub time_year_max: Option<i32>,
    pub has_geo: bool,
    pub geo_levels: Vec<&'static str>,
    pub has_gender: bool,
    pub has_age: bool,
    pub has_residence: bool,
    pub unit_types: Vec<&'static str>,
    pub primary_unit_type: Option<&'static str>,
    pub dim_count: usize,
    pub archetype: &'static str,
    pub parse_coverage: f64,
}

impl From<&DatasetProfile> for ProfileRecord {
    fn from(profile: &DatasetProfile) -> Self {
        Self {
            matrix_code: profile.matrix_code.clone(),
            has_time: profile.has_time,
            time_granularity: profile.time_granularity.map(|g| g.as_str()),
            time_year_min: profile.time_year_min,
            time_year_max: profile.time_year_max,
            has_geo: profile.has_geo,
            geo_levels: profile.geo_level_tokens(),
            has_gender: profile.has_gender,
            has_age: profile.has_age,
            has_residence: profile.has_residence,
            unit_types: profile.unit_type_tokens(),
            primary_unit_type: profile.primary_unit_type.map(|u| u.as_str()),
            dim_count: profile.dim_count,
            archetype: profile.archetype.as_str(),
            parse_coverage: round_coverage(profile.parse_coverage),
        }
    }
}

fn json_array(tokens: &[&str]) -> String {
    serde_json::to_string(tokens).unwrap_or_else(|_| String::from("[]"))
}
