//! Dataset-level semantic profile.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::{Archetype, GeoLevel, TimeGranularity, UnitType};

/// Profile of one dataset, derived from its classified dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub matrix_code: String,
    pub has_time: bool,
    pub time_granularity: Option<TimeGranularity>,
    pub time_year_min: Option<i32>,
    pub time_year_max: Option<i32>,
    pub has_geo: bool,
    pub geo_levels: BTreeSet<GeoLevel>,
    pub has_gender: bool,
    pub has_age: bool,
    pub has_residence: bool,
    pub unit_types: BTreeSet<UnitType>,
    pub primary_unit_type: Option<UnitType>,
    pub dim_count: usize,
    pub archetype: Archetype,
    /// Fraction of option occurrences with confidence at or above 0.8.
    pub parse_coverage: f64,
    /// A geography dimension yielded urban/rural options while the dataset
    /// also has a dedicated residence dimension.
    #[serde(default)]
    pub residence_overlap: bool,
}

impl DatasetProfile {
    /// Values of different unit types must not be summed together.
    pub fn is_unit_aggregable(&self) -> bool {
        self.unit_types.len() <= 1
    }

    /// `geo_levels` tokens in lexical order, as persisted.
    pub fn geo_level_tokens(&self) -> Vec<&'static str> {
        let mut tokens: Vec<&'static str> = self.geo_levels.iter().map(GeoLevel::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    /// `unit_types` tokens in lexical order, as persisted.
    pub fn unit_type_tokens(&self) -> Vec<&'static str> {
        let mut tokens: Vec<&'static str> = self.unit_types.iter().map(UnitType::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}
