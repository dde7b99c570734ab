// The core: cache-aware derivation of named series
pub mod derivations;
pub mod queries;
pub mod transforms;

use crate::analysis::{AnalysisEngine, StatEngine};
use crate::cache::{CacheStore, MemoryCache};
use crate::domain::{DerivativeKey, TimeSeries};

/// Composes the analysis engine and the derivative cache into named
/// derivative operations.
///
/// Both collaborators are injected at construction so the orchestration
/// logic can be exercised against fakes. Every operation is synchronous and
/// runs to completion; windowed derivations re-invoke the engine once per
/// window, an accepted O(len * window) cost.
pub struct DerivationOrchestrator<E, C> {
    engine: E,
    cache: C,
}

impl<E: AnalysisEngine, C: CacheStore> DerivationOrchestrator<E, C> {
    pub fn new(engine: E, cache: C) -> Self {
        Self { engine, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Record a freshly computed derivative. An insert failure is logged
    /// and swallowed: the computed series is still correct and is returned
    /// to the caller, it just may be recomputed on the next request.
    fn persist(&self, key: DerivativeKey, series: &TimeSeries) {
        if let Err(err) = self.cache.insert(key, series) {
            log::warn!(
                "derived series '{}' computed but not persisted: {err}",
                series.name()
            );
        }
    }
}

impl DerivationOrchestrator<StatEngine, MemoryCache> {
    /// Orchestrator over the statrs engine and a fresh in-memory cache.
    pub fn with_defaults() -> Self {
        Self::new(StatEngine, MemoryCache::new())
    }
}
