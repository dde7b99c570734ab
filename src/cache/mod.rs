// Cache of previously computed derivative series
pub mod memory;
pub mod snapshot;

// Re-export commonly used types
pub use memory::MemoryCache;
pub use snapshot::CacheSnapshot;

use crate::domain::{DerivativeKey, TimeSeries};
use crate::errors::Result;

/// Keyed lookup/insert of materialized derivative series.
///
/// Contract: `select_derivative` must succeed for any key for which
/// `dates_are_unavailable` just returned false; a lookup immediately
/// following an insert for the same key observes the inserted series.
pub trait CacheStore {
    /// True when the derivative must be computed (cache miss).
    fn dates_are_unavailable(&self, key: &DerivativeKey) -> bool;

    /// Fetch a previously inserted derivative.
    fn select_derivative(&self, key: &DerivativeKey) -> Result<TimeSeries>;

    /// Record a freshly computed derivative under its identity.
    fn insert(&self, key: DerivativeKey, series: &TimeSeries) -> Result<()>;
}
