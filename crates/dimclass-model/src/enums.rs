//! Closed vocabularies used across classification and profiling.
//!
//! Every enum serializes to the lowercase snake_case token that appears in
//! the output relations (`time`, `quarterly`, `macroregion`, ...), and parses
//! back from the same token case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type assigned to a dimension by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimType {
    /// Reference periods (years, quarters, months, semesters).
    Time,
    /// Territorial units: national, macroregion, region, county, locality.
    Geo,
    /// Sex / gender breakdown.
    Gender,
    /// Ages and age groups.
    Age,
    /// Urban / rural residence area.
    Residence,
    /// Unit of measure (`UM: ...` dimensions).
    Unit,
    /// Generic categorical axis, left unparsed.
    Indicator,
}

impl DimType {
    /// All dimension types in dispatch order, `Indicator` last.
    pub const ALL: [DimType; 7] = [
        DimType::Time,
        DimType::Geo,
        DimType::Gender,
        DimType::Age,
        DimType::Residence,
        DimType::Unit,
        DimType::Indicator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DimType::Time => "time",
            DimType::Geo => "geo",
            DimType::Gender => "gender",
            DimType::Age => "age",
            DimType::Residence => "residence",
            DimType::Unit => "unit",
            DimType::Indicator => "indicator",
        }
    }
}

impl fmt::Display for DimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(DimType::Time),
            "geo" => Ok(DimType::Geo),
            "gender" => Ok(DimType::Gender),
            "age" => Ok(DimType::Age),
            "residence" => Ok(DimType::Residence),
            "unit" => Ok(DimType::Unit),
            "indicator" => Ok(DimType::Indicator),
            _ => Err(format!("Unknown dimension type: {s}")),
        }
    }
}

/// Granularity of a time option, or of a whole dataset's time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGranularity {
    Annual,
    Quarterly,
    Monthly,
    Semester,
    /// Label did not match any time pattern.
    Other,
    /// Dataset-level only: several granularities with non-trivial frequency.
    Mixed,
}

impl TimeGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeGranularity::Annual => "annual",
            TimeGranularity::Quarterly => "quarterly",
            TimeGranularity::Monthly => "monthly",
            TimeGranularity::Semester => "semester",
            TimeGranularity::Other => "other",
            TimeGranularity::Mixed => "mixed",
        }
    }
}

impl fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(TimeGranularity::Annual),
            "quarterly" => Ok(TimeGranularity::Quarterly),
            "monthly" => Ok(TimeGranularity::Monthly),
            "semester" => Ok(TimeGranularity::Semester),
            "other" => Ok(TimeGranularity::Other),
            "mixed" => Ok(TimeGranularity::Mixed),
            _ => Err(format!("Unknown time granularity: {s}")),
        }
    }
}

/// Territorial level of a geography option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    National,
    Macroregion,
    Region,
    County,
    Locality,
    /// Urban/rural text found inside a geography dimension.
    Residence,
    /// Foreign country from the closed country list.
    Country,
    Unknown,
}

impl GeoLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoLevel::National => "national",
            GeoLevel::Macroregion => "macroregion",
            GeoLevel::Region => "region",
            GeoLevel::County => "county",
            GeoLevel::Locality => "locality",
            GeoLevel::Residence => "residence",
            GeoLevel::Country => "country",
            GeoLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "national" => Ok(GeoLevel::National),
            "macroregion" => Ok(GeoLevel::Macroregion),
            "region" => Ok(GeoLevel::Region),
            "county" => Ok(GeoLevel::County),
            "locality" => Ok(GeoLevel::Locality),
            "residence" => Ok(GeoLevel::Residence),
            "country" => Ok(GeoLevel::Country),
            "unknown" => Ok(GeoLevel::Unknown),
            _ => Err(format!("Unknown geo level: {s}")),
        }
    }
}

/// Value of a gender option.
///
/// `Unknown` is the explicit "sex necunoscut" category; a label that matches
/// nothing is represented by the absence of a value, not by `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Total,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Total => "total",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "total" => Ok(Gender::Total),
            "unknown" => Ok(Gender::Unknown),
            _ => Err(format!("Unknown gender: {s}")),
        }
    }
}

/// Residence area of a residence option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidenceArea {
    Urban,
    Rural,
    Total,
}

impl ResidenceArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidenceArea::Urban => "urban",
            ResidenceArea::Rural => "rural",
            ResidenceArea::Total => "total",
        }
    }
}

impl fmt::Display for ResidenceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of quantity a unit of measure expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Percentage,
    Count,
    Currency,
    Area,
    Weight,
    Energy,
    Index,
    Rate,
    Distance,
    TimeUnit,
    Other,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Percentage => "percentage",
            UnitType::Count => "count",
            UnitType::Currency => "currency",
            UnitType::Area => "area",
            UnitType::Weight => "weight",
            UnitType::Energy => "energy",
            UnitType::Index => "index",
            UnitType::Rate => "rate",
            UnitType::Distance => "distance",
            UnitType::TimeUnit => "time_unit",
            UnitType::Other => "other",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" => Ok(UnitType::Percentage),
            "count" => Ok(UnitType::Count),
            "currency" => Ok(UnitType::Currency),
            "area" => Ok(UnitType::Area),
            "weight" => Ok(UnitType::Weight),
            "energy" => Ok(UnitType::Energy),
            "index" => Ok(UnitType::Index),
            "rate" => Ok(UnitType::Rate),
            "distance" => Ok(UnitType::Distance),
            "time_unit" => Ok(UnitType::TimeUnit),
            "other" => Ok(UnitType::Other),
            _ => Err(format!("Unknown unit type: {s}")),
        }
    }
}

/// Coarse dataset archetype, used downstream to pick a default visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    GeoTime,
    Demographic,
    TimeResidence,
    TimeSeries,
    Other,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::GeoTime => "geo_time",
            Archetype::Demographic => "demographic",
            Archetype::TimeResidence => "time_residence",
            Archetype::TimeSeries => "time_series",
            Archetype::Other => "other",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
