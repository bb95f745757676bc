//! Per-type option parsers.
//!
//! | Type | Parser | Dimension keywords |
//! |------|--------|--------------------|
//! | time | [`TimeParser`] | perioade, ani, trimestre, semestre, luni calendaristice; bare `luni` only as the whole label |
//! | geo | [`GeoParser`] | macroregiuni, regiuni, judete, localitati, tari |
//! | gender | [`GenderParser`] | sex, sexe |
//! | age | [`AgeParser`] | varsta, grupe de varsta |
//! | residence | [`ResidenceParser`] | medii de rezidenta, urban, rural |
//! | unit | [`UnitParser`] | `UM:` prefix (claims ahead of every keyword), unitati de masura |
//! | indicator | [`IndicatorParser`] | fallback |

mod age;
mod gender;
mod geo;
mod indicator;
mod residence;
mod time;
mod unit;

pub use age::AgeParser;
pub use gender::GenderParser;
pub use geo::GeoParser;
pub use indicator::IndicatorParser;
pub use residence::ResidenceParser;
pub use time::{TimeParser, month_number, roman_to_number};
pub use unit::UnitParser;

use crate::normalize::contains_phrase;

/// True when any phrase occurs in `text` on word boundaries.
pub(crate) fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| contains_phrase(text, phrase))
}
