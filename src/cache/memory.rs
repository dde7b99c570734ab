//! In-memory cache of materialized derivative series.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cache::CacheStore;
use crate::domain::{DerivativeKey, TimeSeries};
use crate::errors::{DeriveError, Result};

/// HashMap-backed store. Cloning shares the underlying map, so a cloned
/// handle observes every insert made through any other handle.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<DerivativeKey, TimeSeries>>>,
}

impl Clone for MemoryCache {
    fn clone(&self) -> Self {
        Self {
            // Clone the Arc, not the HashMap - this shares the cache!
            entries: Arc::clone(&self.entries),
        }
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the current contents, used by file persistence.
    pub(crate) fn export_entries(&self) -> Vec<(DerivativeKey, TimeSeries)> {
        self.entries
            .lock()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    pub(crate) fn from_entries(entries: Vec<(DerivativeKey, TimeSeries)>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries.into_iter().collect())),
        }
    }
}

impl CacheStore for MemoryCache {
    fn dates_are_unavailable(&self, key: &DerivativeKey) -> bool {
        match self.entries.lock() {
            Ok(map) => !map.contains_key(key),
            // A poisoned lock means some caller panicked mid-insert; report
            // unavailable and let the derivation recompute.
            Err(_) => true,
        }
    }

    fn select_derivative(&self, key: &DerivativeKey) -> Result<TimeSeries> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
            .ok_or_else(|| DeriveError::CacheInconsistency {
                name: key.display_name(),
            })
    }

    fn insert(&self, key: DerivativeKey, series: &TimeSeries) -> Result<()> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| DeriveError::computation("cache lock poisoned during insert"))?;
        // Entries are write-once: the first materialization wins.
        map.entry(key).or_insert_with(|| series.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, Operation};
    use chrono::NaiveDate;

    fn sample_series(name: &str) -> TimeSeries {
        let dates = (1..=4)
            .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
            .collect();
        TimeSeries::new(dates, name, vec![1.0, 2.0, 3.0, 4.0]).unwrap()
    }

    fn sample_key(series: &TimeSeries) -> DerivativeKey {
        DerivativeKey::for_series(series, Operation::mean_return(2, Direction::Long, 1.0))
    }

    #[test]
    fn test_round_trip() {
        let cache = MemoryCache::new();
        let series = sample_series("AAPL");
        let key = sample_key(&series);

        assert!(cache.dates_are_unavailable(&key));
        cache.insert(key.clone(), &series).unwrap();
        assert!(!cache.dates_are_unavailable(&key));

        let fetched = cache.select_derivative(&key).unwrap();
        assert_eq!(fetched, series, "cached series must round-trip unchanged");
    }

    #[test]
    fn test_select_without_insert_reports_inconsistency() {
        let cache = MemoryCache::new();
        let series = sample_series("AAPL");
        let key = sample_key(&series);
        let result = cache.select_derivative(&key);
        assert!(matches!(result, Err(DeriveError::CacheInconsistency { .. })));
    }

    #[test]
    fn test_entries_are_write_once() {
        let cache = MemoryCache::new();
        let first = sample_series("AAPL");
        let key = sample_key(&first);
        cache.insert(key.clone(), &first).unwrap();

        let dates = (1..=4)
            .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
            .collect();
        let second = TimeSeries::new(dates, "AAPL", vec![9.0, 9.0, 9.0, 9.0]).unwrap();
        cache.insert(key.clone(), &second).unwrap();

        assert_eq!(
            cache.select_derivative(&key).unwrap(),
            first,
            "second insert for the same key must not overwrite"
        );
    }

    #[test]
    fn test_clone_shares_entries() {
        let cache = MemoryCache::new();
        let handle = cache.clone();
        let series = sample_series("AAPL");
        let key = sample_key(&series);

        cache.insert(key.clone(), &series).unwrap();
        assert!(!handle.dates_are_unavailable(&key));
    }
}
