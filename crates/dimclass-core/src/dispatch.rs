//! Dimension parser trait and ordered registry.
//!
//! Each semantic dimension type is handled by one [`DimensionParser`]. The
//! [`ParserRegistry`] keeps them in dispatch order. A parser whose
//! [`claims`](DimensionParser::claims) recognizes a structural marker (the
//! `UM:` prefix) wins outright; otherwise the first parser whose
//! [`matches`](DimensionParser::matches) accepts a dimension label decides the
//! dimension type, and the fallback parser (indicator) takes everything else.
//!
//! # Example
//!
//! ```ignore
//! use dimclass_core::{ParserRegistry, normalize};
//!
//! let registry = ParserRegistry::from_vocabulary(&vocabulary);
//! let dim_type = registry.dispatch("Trimestre");
//! let outcome = registry.classify(dim_type, Some("Trimestrul IV 2020"));
//! ```

use dimclass_model::{DimType, ParseOutcome};
use dimclass_standards::Vocabulary;

use crate::normalize::normalize;
use crate::parsers::{
    AgeParser, GenderParser, GeoParser, IndicatorParser, ResidenceParser, TimeParser, UnitParser,
};

/// Strategy for one dimension type.
///
/// Implementations must be total: `parse` never fails, it reports an
/// unmatched label through a zero-confidence [`ParseOutcome`].
pub trait DimensionParser: Send + Sync {
    /// Dimension type this parser produces.
    fn dim_type(&self) -> DimType;

    /// Returns a human-readable description of the parser.
    fn description(&self) -> &'static str {
        "Dimension parser"
    }

    /// Structural marker that assigns the dimension before any keyword rule.
    fn claims(&self, _dimension_label: &str) -> bool {
        false
    }

    /// Whether a dimension with this normalized label belongs to this parser.
    fn matches(&self, dimension_label: &str) -> bool;

    /// Parses one option label.
    ///
    /// `raw` is the trimmed source label (used for display names and codes),
    /// `normalized` its [`normalize`]d form (used for matching).
    fn parse(&self, raw: &str, normalized: &str) -> ParseOutcome;
}

/// Dispatch decision for one dimension label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub dim_type: DimType,
    /// Description of the parser that claimed the label.
    pub parser: &'static str,
    /// True when no rule matched and the fallback was used.
    pub fallback: bool,
}

/// Ordered list of parsers with a fallback for unmatched dimensions.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DimensionParser>>,
    fallback: Box<dyn DimensionParser>,
}

impl ParserRegistry {
    /// Creates an empty registry with the given fallback parser.
    pub fn new(fallback: Box<dyn DimensionParser>) -> Self {
        Self {
            parsers: Vec::new(),
            fallback,
        }
    }

    /// Appends a parser at the end of the dispatch order.
    ///
    /// A parser already registered for the same type is replaced in place,
    /// keeping its position.
    pub fn register(&mut self, parser: Box<dyn DimensionParser>) {
        match self
            .parsers
            .iter()
            .position(|p| p.dim_type() == parser.dim_type())
        {
            Some(idx) => self.parsers[idx] = parser,
            None => self.parsers.push(parser),
        }
    }

    /// Standard registry: time, geo, gender, age, residence, unit, then indicator.
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Self {
        let mut registry = Self::new(Box::new(IndicatorParser));
        registry.register(Box::new(TimeParser));
        registry.register(Box::new(GeoParser::new(
            &vocabulary.counties,
            &vocabulary.countries,
        )));
        registry.register(Box::new(GenderParser));
        registry.register(Box::new(AgeParser));
        registry.register(Box::new(ResidenceParser));
        registry.register(Box::new(UnitParser::new(&vocabulary.units)));
        registry
    }

    /// Assigns a dimension type to a raw dimension label.
    pub fn dispatch(&self, dimension_label: &str) -> DimType {
        self.dispatch_detailed(dimension_label).dim_type
    }

    /// Like [`dispatch`](Self::dispatch), also reporting which parser claimed the label.
    pub fn dispatch_detailed(&self, dimension_label: &str) -> Dispatch {
        let normalized = normalize(dimension_label);
        let claimed = self
            .parsers
            .iter()
            .find(|p| p.claims(&normalized))
            .or_else(|| self.parsers.iter().find(|p| p.matches(&normalized)));
        match claimed {
            Some(parser) => Dispatch {
                dim_type: parser.dim_type(),
                parser: parser.description(),
                fallback: false,
            },
            None => Dispatch {
                dim_type: self.fallback.dim_type(),
                parser: self.fallback.description(),
                fallback: true,
            },
        }
    }

    /// Gets the parser for a dimension type, or the fallback.
    pub fn get(&self, dim_type: DimType) -> &dyn DimensionParser {
        self.parsers
            .iter()
            .find(|p| p.dim_type() == dim_type)
            .map_or(self.fallback.as_ref(), |p| p.as_ref())
    }

    /// Parses one option label with the parser for `dim_type`.
    ///
    /// A missing (undecodable) label is unmatched without invoking a parser.
    pub fn classify(&self, dim_type: DimType, raw_label: Option<&str>) -> ParseOutcome {
        let Some(raw) = raw_label else {
            return ParseOutcome::unmatched(dim_type);
        };
        let raw = raw.trim();
        let normalized = normalize(raw);
        self.get(dim_type).parse(raw, &normalized)
    }

    /// Returns the number of registered parsers (excluding fallback).
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Returns true if no parsers are registered (excluding fallback).
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Dimension types in dispatch order, fallback last.
    pub fn dim_types(&self) -> impl Iterator<Item = DimType> + '_ {
        self.parsers
            .iter()
            .map(|p| p.dim_type())
            .chain(std::iter::once(self.fallback.dim_type()))
    }
}
