//! Classification cache: each option id is parsed at most once per run.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use dimclass_model::{ClassifiedOption, DimType, OptionId};
use rayon::prelude::*;
use serde::Serialize;

use crate::dispatch::ParserRegistry;

/// One classification request: an option occurrence with its dispatched type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRequest<'a> {
    pub option_id: OptionId,
    pub raw_label: Option<&'a str>,
    pub dim_type: DimType,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Parser calls; equals `misses` unless a request was malformed.
    pub parser_invocations: usize,
    /// Occurrences of an id under a different type than the one first seen.
    pub conflicts: usize,
}

/// Per-run store of classified options keyed by option id.
///
/// The first dimension type seen for an id wins. Later occurrences under
/// another type are counted as conflicts and answered from the cache.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: HashMap<OptionId, ClassifiedOption>,
    stats: CacheStats,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached classification or parses and stores it.
    pub fn get_or_compute(
        &mut self,
        registry: &ParserRegistry,
        request: ClassificationRequest<'_>,
    ) -> &ClassifiedOption {
        match self.entries.entry(request.option_id) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                let cached = entry.into_mut();
                if cached.dim_type != request.dim_type {
                    self.stats.conflicts += 1;
                    tracing::debug!(
                        option_id = request.option_id,
                        cached = %cached.dim_type,
                        requested = %request.dim_type,
                        "option id seen under a different dimension type"
                    );
                }
                cached
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                if request.raw_label.is_some() {
                    self.stats.parser_invocations += 1;
                }
                entry.insert(classify(registry, request))
            }
        }
    }

    /// Classifies a batch, parsing the missing distinct ids in parallel.
    ///
    /// Counters end up identical to calling [`get_or_compute`](Self::get_or_compute)
    /// for each request in order.
    pub fn classify_parallel(
        &mut self,
        registry: &ParserRegistry,
        requests: &[ClassificationRequest<'_>],
        on_parsed: &(dyn Fn() + Sync),
    ) {
        let mut pending: Vec<ClassificationRequest<'_>> = Vec::new();
        let mut first_type: HashMap<OptionId, DimType> = HashMap::new();

        for request in requests {
            let seen_type = self
                .entries
                .get(&request.option_id)
                .map(|option| option.dim_type)
                .or_else(|| first_type.get(&request.option_id).copied());
            match seen_type {
                Some(dim_type) => {
                    self.stats.hits += 1;
                    if dim_type != request.dim_type {
                        self.stats.conflicts += 1;
                        tracing::debug!(
                            option_id = request.option_id,
                            cached = %dim_type,
                            requested = %request.dim_type,
                            "option id seen under a different dimension type"
                        );
                    }
                }
                None => {
                    self.stats.misses += 1;
                    first_type.insert(request.option_id, request.dim_type);
                    pending.push(*request);
                }
            }
        }

        let parsed: Vec<ClassifiedOption> = pending
            .par_iter()
            .map(|request| {
                let option = classify(registry, *request);
                on_parsed();
                option
            })
            .collect();

        self.stats.parser_invocations += pending.iter().filter(|r| r.raw_label.is_some()).count();
        for option in parsed {
            self.entries.insert(option.option_id, option);
        }
    }

    pub fn get(&self, option_id: OptionId) -> Option<&ClassifiedOption> {
        self.entries.get(&option_id)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the cache, returning all options sorted by id.
    pub fn into_sorted_options(self) -> Vec<ClassifiedOption> {
        let mut options: Vec<_> = self.entries.into_values().collect();
        options.sort_by_key(|option| option.option_id);
        options
    }
}

fn classify(registry: &ParserRegistry, request: ClassificationRequest<'_>) -> ClassifiedOption {
    if request.raw_label.is_none() {
        tracing::warn!(
            option_id = request.option_id,
            "malformed option label, classified as unmatched"
        );
    }
    let outcome = registry.classify(request.dim_type, request.raw_label);
    ClassifiedOption::new(
        request.option_id,
        request.raw_label.map(str::to_string),
        outcome,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimclass_standards::Vocabulary;

    fn registry() -> ParserRegistry {
        ParserRegistry::from_vocabulary(&Vocabulary::embedded().unwrap())
    }

    fn request(option_id: OptionId, label: &str, dim_type: DimType) -> ClassificationRequest<'_> {
        ClassificationRequest {
            option_id,
            raw_label: Some(label),
            dim_type,
        }
    }

    #[test]
    fn test_hit_returns_cached_result() {
        let registry = registry();
        let mut cache = ClassificationCache::new();
        let first = cache
            .get_or_compute(&registry, request(1, "Anul 2020", DimType::Time))
            .clone();
        let second = cache
            .get_or_compute(&registry, request(1, "Anul 2020", DimType::Time))
            .clone();
        assert_eq!(first, second);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                parser_invocations: 1,
                conflicts: 0
            }
        );
    }

    #[test]
    fn test_first_seen_type_wins() {
        let registry = registry();
        let mut cache = ClassificationCache::new();
        cache.get_or_compute(&registry, request(5, "Total", DimType::Geo));
        let option = cache.get_or_compute(&registry, request(5, "Total", DimType::Gender));
        assert_eq!(option.dim_type, DimType::Geo);
        assert_eq!(cache.stats().conflicts, 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let registry = registry();
        let requests = vec![
            request(1, "Anul 2020", DimType::Time),
            request(2, "Bihor", DimType::Geo),
            request(1, "Anul 2020", DimType::Time),
            request(3, "Procente", DimType::Unit),
            request(2, "Bihor", DimType::Indicator),
        ];

        let mut sequential = ClassificationCache::new();
        for r in &requests {
            sequential.get_or_compute(&registry, *r);
        }
        let mut parallel = ClassificationCache::new();
        parallel.classify_parallel(&registry, &requests, &|| {});

        assert_eq!(sequential.stats(), parallel.stats());
        assert_eq!(
            sequential.into_sorted_options(),
            parallel.into_sorted_options()
        );
    }

    #[test]
    fn test_malformed_label_is_unmatched() {
        let registry = registry();
        let mut cache = ClassificationCache::new();
        let option = cache.get_or_compute(
            &registry,
            ClassificationRequest {
                option_id: 9,
                raw_label: None,
                dim_type: DimType::Indicator,
            },
        );
        assert!(option.is_unmatched());
        assert_eq!(cache.stats().parser_invocations, 0);
    }
}
