//! Classified options: structured fields extracted from one option label.

use serde::{Deserialize, Serialize};

use crate::enums::{DimType, Gender, GeoLevel, ResidenceArea, TimeGranularity, UnitType};
use crate::option::OptionId;

/// Confidence assigned when a label matched a known pattern.
pub const CONFIDENCE_MATCHED: f64 = 1.0;

/// Confidence assigned when no pattern matched.
pub const CONFIDENCE_UNMATCHED: f64 = 0.0;

/// Options at or above this confidence count toward `parse_coverage`.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Upper bound used for open-ended age groups ("65 ani si peste", "total").
pub const AGE_OPEN_UPPER: u16 = 999;

/// Time fields. Every field is `None` when the label is unmatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFields {
    pub year: Option<i32>,
    pub quarter: Option<u8>,
    pub month: Option<u8>,
    pub semester: Option<u8>,
    pub granularity: TimeGranularity,
}

impl TimeFields {
    pub fn annual(year: i32) -> Self {
        Self {
            year: Some(year),
            quarter: None,
            month: None,
            semester: None,
            granularity: TimeGranularity::Annual,
        }
    }

    pub fn quarterly(year: i32, quarter: u8) -> Self {
        Self {
            quarter: Some(quarter),
            granularity: TimeGranularity::Quarterly,
            ..Self::annual(year)
        }
    }

    pub fn semester(year: i32, semester: u8) -> Self {
        Self {
            semester: Some(semester),
            granularity: TimeGranularity::Semester,
            ..Self::annual(year)
        }
    }

    pub fn monthly(year: i32, month: u8) -> Self {
        Self {
            month: Some(month),
            granularity: TimeGranularity::Monthly,
            ..Self::annual(year)
        }
    }

    pub fn unmatched() -> Self {
        Self {
            year: None,
            quarter: None,
            month: None,
            semester: None,
            granularity: TimeGranularity::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoFields {
    pub level: GeoLevel,
    pub siruta_code: Option<u32>,
    pub name_clean: Option<String>,
}

impl GeoFields {
    pub fn new(level: GeoLevel, name_clean: impl Into<String>) -> Self {
        Self {
            level,
            siruta_code: None,
            name_clean: Some(name_clean.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderFields {
    pub gender: Option<Gender>,
}

/// Inclusive age bounds in years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeFields {
    pub min: Option<u16>,
    pub max: Option<u16>,
}

impl AgeFields {
    pub fn range(min: u16, max: u16) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidenceFields {
    pub area: Option<ResidenceArea>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFields {
    pub unit_type: UnitType,
    /// Multiplier applied to raw values (1, 1000, 1_000_000, ...).
    pub scale: u64,
    /// ISO 4217-style currency code for `Currency` units.
    pub currency: Option<String>,
}

impl UnitFields {
    pub fn unmatched() -> Self {
        Self {
            unit_type: UnitType::Other,
            scale: 1,
            currency: None,
        }
    }
}

/// Type-specific structured fields of a classified option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedFields {
    Time(TimeFields),
    Geo(GeoFields),
    Gender(GenderFields),
    Age(AgeFields),
    Residence(ResidenceFields),
    Unit(UnitFields),
    Indicator,
}

impl ParsedFields {
    /// Type-appropriate "nothing matched" fields.
    pub fn unmatched(dim_type: DimType) -> Self {
        match dim_type {
            DimType::Time => ParsedFields::Time(TimeFields::unmatched()),
            DimType::Geo => ParsedFields::Geo(GeoFields {
                level: GeoLevel::Unknown,
                siruta_code: None,
                name_clean: None,
            }),
            DimType::Gender => ParsedFields::Gender(GenderFields { gender: None }),
            DimType::Age => ParsedFields::Age(AgeFields {
                min: None,
                max: None,
            }),
            DimType::Residence => ParsedFields::Residence(ResidenceFields { area: None }),
            DimType::Unit => ParsedFields::Unit(UnitFields::unmatched()),
            DimType::Indicator => ParsedFields::Indicator,
        }
    }

    /// The dimension type these fields belong to.
    pub fn dim_type(&self) -> DimType {
        match self {
            ParsedFields::Time(_) => DimType::Time,
            ParsedFields::Geo(_) => DimType::Geo,
            ParsedFields::Gender(_) => DimType::Gender,
            ParsedFields::Age(_) => DimType::Age,
            ParsedFields::Residence(_) => DimType::Residence,
            ParsedFields::Unit(_) => DimType::Unit,
            ParsedFields::Indicator => DimType::Indicator,
        }
    }
}

/// Parser result: structured fields plus a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub fields: ParsedFields,
    pub confidence: f64,
}

impl ParseOutcome {
    pub fn matched(fields: ParsedFields) -> Self {
        Self {
            fields,
            confidence: CONFIDENCE_MATCHED,
        }
    }

    pub fn unmatched(dim_type: DimType) -> Self {
        Self {
            fields: ParsedFields::unmatched(dim_type),
            confidence: CONFIDENCE_UNMATCHED,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.confidence > CONFIDENCE_UNMATCHED
    }
}

/// One classified option, unique per `option_id` within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedOption {
    pub option_id: OptionId,
    pub dim_type: DimType,
    pub fields: ParsedFields,
    pub parse_confidence: f64,
    pub raw_label: Option<String>,
}

impl ClassifiedOption {
    pub fn new(option_id: OptionId, raw_label: Option<String>, outcome: ParseOutcome) -> Self {
        Self {
            option_id,
            dim_type: outcome.fields.dim_type(),
            fields: outcome.fields,
            parse_confidence: outcome.confidence.clamp(0.0, 1.0),
            raw_label,
        }
    }

    pub fn is_high_confidence(&self) -> bool {
        self.parse_confidence >= HIGH_CONFIDENCE_THRESHOLD
    }

    pub fn is_unmatched(&self) -> bool {
        self.parse_confidence <= CONFIDENCE_UNMATCHED
    }

    pub fn time(&self) -> Option<&TimeFields> {
        match &self.fields {
            ParsedFields::Time(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn geo(&self) -> Option<&GeoFields> {
        match &self.fields {
            ParsedFields::Geo(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&UnitFields> {
        match &self.fields {
            ParsedFields::Unit(fields) => Some(fields),
            _ => None,
        }
    }

    /// Flattens the option into the output relation shape.
    pub fn to_row(&self) -> ClassifiedOptionRow {
        ClassifiedOptionRow::from(self)
    }
}

/// Flat row of the Classified Options relation.
///
/// Residence options are stored through the geography columns
/// (`geo_level = residence`, `geo_name_clean = urban|rural|total`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedOptionRow {
    pub option_id: OptionId,
    pub dim_type: String,
    pub year: Option<i32>,
    pub quarter: Option<u8>,
    pub month: Option<u8>,
    pub semester: Option<u8>,
    pub time_granularity: Option<String>,
    pub geo_level: Option<String>,
    pub siruta_code: Option<u32>,
    pub geo_name_clean: Option<String>,
    pub gender: Option<String>,
    pub age_min: Option<u16>,
    pub age_max: Option<u16>,
    pub unit_type: Option<String>,
    pub unit_scale: Option<u64>,
    pub currency: Option<String>,
    pub parse_confidence: f64,
    pub raw_label: Option<String>,
}

impl From<&ClassifiedOption> for ClassifiedOptionRow {
    fn from(option: &ClassifiedOption) -> Self {
        let mut row = ClassifiedOptionRow {
            option_id: option.option_id,
            dim_type: option.dim_type.as_str().to_string(),
            parse_confidence: option.parse_confidence,
            raw_label: option.raw_label.clone(),
            ..ClassifiedOptionRow::default()
        };
        match &option.fields {
            ParsedFields::Time(time) => {
                row.year = time.year;
                row.quarter = time.quarter;
                row.month = time.month;
                row.semester = time.semester;
                row.time_granularity = Some(time.granularity.as_str().to_string());
            }
            ParsedFields::Geo(geo) => {
                row.geo_level = Some(geo.level.as_str().to_string());
                row.siruta_code = geo.siruta_code;
                row.geo_name_clean = geo.name_clean.clone();
            }
            ParsedFields::Gender(gender) => {
                row.gender = gender.gender.map(|g| g.as_str().to_string());
            }
            ParsedFields::Age(age) => {
                row.age_min = age.min;
                row.age_max = age.max;
            }
            ParsedFields::Residence(residence) => {
                row.geo_level = Some(GeoLevel::Residence.as_str().to_string());
                row.geo_name_clean = residence.area.map(|a| a.as_str().to_string());
            }
            ParsedFields::Unit(unit) => {
                row.unit_type = Some(unit.unit_type.as_str().to_string());
                row.unit_scale = Some(unit.scale);
                row.currency = unit.currency.clone();
            }
            ParsedFields::Indicator => {}
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_fields_follow_dim_type() {
        for dim_type in DimType::ALL {
            let outcome = ParseOutcome::unmatched(dim_type);
            assert_eq!(outcome.fields.dim_type(), dim_type);
            assert_eq!(outcome.confidence, CONFIDENCE_UNMATCHED);
        }
    }

    #[test]
    fn test_confidence_is_clamped() {
        let outcome = ParseOutcome {
            fields: ParsedFields::Indicator,
            confidence: 1.7,
        };
        let option = ClassifiedOption::new(1, Some("x".to_string()), outcome);
        assert_eq!(option.parse_confidence, 1.0);
    }

    #[test]
    fn test_residence_row_uses_geo_columns() {
        let option = ClassifiedOption::new(
            7,
            Some("Urban".to_string()),
            ParseOutcome::matched(ParsedFields::Residence(ResidenceFields {
                area: Some(ResidenceArea::Urban),
            })),
        );
        let row = option.to_row();
        assert_eq!(row.dim_type, "residence");
        assert_eq!(row.geo_level.as_deref(), Some("residence"));
        assert_eq!(row.geo_name_clean.as_deref(), Some("urban"));
        assert!(row.unit_type.is_none());
    }
}
