//! Derived statistical time series with cache-aware orchestration.
//!
//! The orchestrator turns named, dated value series into derivative series
//! (rolling returns, regression divergences, probabilities, projections),
//! memoizing each cacheable derivation under a structured identity so
//! repeated requests never recompute.

// Core modules
pub mod analysis;
pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod orchestrator;

// Re-export commonly used types
pub use analysis::{AnalysisEngine, BetaFit, GaussianFit, ProjectionSpec, StatEngine};
pub use cache::{CacheSnapshot, CacheStore, MemoryCache};
pub use domain::{DerivativeKey, Direction, DistributionTensor, Operation, TimeSeries};
pub use errors::{DeriveError, Result};
pub use orchestrator::DerivationOrchestrator;
