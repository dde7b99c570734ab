//! Bincode persistence for the derivative cache.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cache::MemoryCache;
use crate::config::{PERSISTENCE, snapshot_filename};
use crate::domain::{DerivativeKey, TimeSeries};

/// Serialized cache wrapper written to and read from disk.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheSnapshot {
    pub version: f64,
    pub timestamp_ms: i64,
    pub entries: Vec<(DerivativeKey, TimeSeries)>,
}

impl CacheSnapshot {
    pub fn capture(cache: &MemoryCache) -> Self {
        Self {
            version: PERSISTENCE.snapshot_version,
            timestamp_ms: Utc::now().timestamp_millis(),
            entries: cache.export_entries(),
        }
    }

    pub fn restore(self) -> MemoryCache {
        MemoryCache::from_entries(self.entries)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open snapshot file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let snapshot = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize snapshot: {:?}", path))?;
        Ok(snapshot)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize snapshot to: {}", path.display()))
    }

    pub fn default_snapshot_path() -> PathBuf {
        PathBuf::from(PERSISTENCE.directory).join(snapshot_filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::domain::{Direction, Operation};
    use chrono::NaiveDate;

    fn populated_cache() -> (MemoryCache, DerivativeKey, TimeSeries) {
        let cache = MemoryCache::new();
        let dates = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap())
            .collect();
        let series = TimeSeries::new(dates, "AAPL", vec![1.0, 2.0, 3.0]).unwrap();
        let key = DerivativeKey::for_series(&series, Operation::mean_return(2, Direction::Long, 1.0));
        cache.insert(key.clone(), &series).unwrap();
        (cache, key, series)
    }

    #[test]
    fn test_capture_and_restore() {
        let (cache, key, series) = populated_cache();
        let restored = CacheSnapshot::capture(&cache).restore();
        assert_eq!(restored.select_derivative(&key).unwrap(), series);
    }

    #[test]
    fn test_file_round_trip() {
        let (cache, key, series) = populated_cache();
        let snapshot = CacheSnapshot::capture(&cache);
        let path = std::env::temp_dir()
            .join(format!("series_forge_snapshot_{}", std::process::id()))
            .join(snapshot_filename());

        snapshot.save_to_path(&path).unwrap();
        let loaded = CacheSnapshot::load_from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.version, PERSISTENCE.snapshot_version);
        assert_eq!(loaded.timestamp_ms, snapshot.timestamp_ms);
        let restored = loaded.restore();
        assert_eq!(restored.select_derivative(&key).unwrap(), series);
    }
}
