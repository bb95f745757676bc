//! Data model for dimension classification.
//!
//! - **enums**: closed vocabularies (`DimType`, `GeoLevel`, `UnitType`, ...)
//! - **option**: input occurrences supplied by the metadata loader
//! - **classified**: per-option structured fields and confidence
//! - **profile**: per-dataset archetype profile

pub mod classified;
pub mod enums;
pub mod option;
pub mod profile;

pub use classified::{
    AGE_OPEN_UPPER, AgeFields, CONFIDENCE_MATCHED, CONFIDENCE_UNMATCHED, ClassifiedOption,
    ClassifiedOptionRow, GenderFields, GeoFields, HIGH_CONFIDENCE_THRESHOLD, ParseOutcome,
    ParsedFields, ResidenceFields, TimeFields, UnitFields,
};
pub use enums::{Archetype, DimType, Gender, GeoLevel, ResidenceArea, TimeGranularity, UnitType};
pub use option::{DimensionDefinition, DimensionKey, OptionId, OptionOccurrence};
pub use profile::DatasetProfile;
