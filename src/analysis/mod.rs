// Numeric engine: the trait the orchestrator calls and the statrs-backed default
pub mod engine;
pub mod stat_engine;

// Re-export commonly used types
pub use engine::{AnalysisEngine, BetaFit, GaussianFit, ProjectionSpec};
pub use stat_engine::StatEngine;
