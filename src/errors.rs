use thiserror::Error;

/// Failure taxonomy for derivation work.
///
/// Nothing in the crate recovers locally: every variant surfaces unchanged
/// to the caller, and a failure mid-derivation never leaves a partial cache
/// entry behind.
#[derive(Error, Debug)]
pub enum DeriveError {
    /// The series record itself is malformed (length mismatch, empty,
    /// non-monotonic dates, or two series that should share a date axis
    /// but don't).
    #[error("schema violation: {reason}")]
    Schema { reason: String },

    /// A numeric routine could not produce a result (degenerate regression,
    /// empty window, invalid bin count, out-of-range query, ...).
    #[error("computation failed: {reason}")]
    Computation { reason: String },

    /// The cache reported a derivative as available but could not produce it.
    #[error("cache contract violated for '{name}': entry vanished between lookup and select")]
    CacheInconsistency { name: String },
}

impl DeriveError {
    pub fn schema(reason: impl Into<String>) -> Self {
        DeriveError::Schema {
            reason: reason.into(),
        }
    }

    pub fn computation(reason: impl Into<String>) -> Self {
        DeriveError::Computation {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeriveError>;
