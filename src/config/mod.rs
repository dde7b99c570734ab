//! Configuration module for the series-forge crate.

pub mod analysis;
pub mod persistence;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use persistence::{PERSISTENCE, snapshot_filename};
