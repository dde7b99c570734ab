//! File persistence and serialization configuration

/// Cache snapshot persistence settings
pub struct PersistenceConfig {
    /// Directory path for storing cache snapshots
    pub directory: &'static str,
    /// Base filename for snapshot files (without extension)
    pub filename_without_ext: &'static str,
    /// Current version of the snapshot serialization format
    pub snapshot_version: f64,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    directory: "derivative_cache",
    filename_without_ext: "derivatives",
    snapshot_version: 1.0,
};

/// Generate the versioned snapshot filename
/// Example: "derivatives_v1.bin"
pub fn snapshot_filename() -> String {
    format!(
        "{}_v{}.bin",
        PERSISTENCE.filename_without_ext, PERSISTENCE.snapshot_version
    )
}
