//! The numeric contract the orchestrator delegates to.
//!
//! Everything here operates on raw value slices, not on [`TimeSeries`]
//! records: the orchestrator owns naming, dating and caching, the engine
//! owns the arithmetic. Keeping the engine behind a trait lets tests swap
//! in counting or canned implementations without touching the orchestration
//! logic.
//!
//! [`TimeSeries`]: crate::domain::TimeSeries

use serde::{Deserialize, Serialize};

use crate::config::ANALYSIS;
use crate::domain::{Direction, DistributionTensor};
use crate::errors::Result;

/// Parameters of a fitted gaussian.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GaussianFit {
    pub mean: f64,
    pub std_dev: f64,
}

/// Parameters of a fitted beta distribution.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BetaFit {
    pub alpha: f64,
    pub beta: f64,
}

/// How a forward projection walks the fitted return distribution.
///
/// `quantile` selects the per-step return from the gaussian fit to the
/// series' one-step relative changes: 0.5 projects along the mean drift,
/// higher/lower quantiles trace optimistic/pessimistic paths.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSpec {
    pub quantile: f64,
}

impl Default for ProjectionSpec {
    fn default() -> Self {
        Self {
            quantile: ANALYSIS.distribution.default_projection_quantile,
        }
    }
}

/// Stateless numeric routines over raw value arrays.
pub trait AnalysisEngine {
    /// Realized return over one window: sign set by `direction`, scaled
    /// linearly by `leverage`.
    fn mean_return(&self, window: &[f64], direction: Direction, leverage: f64) -> Result<f64>;

    /// Ordinary least squares of `dependent` on `independent`, returning the
    /// fitted values aligned to `independent`.
    fn linear_regress(&self, independent: &[f64], dependent: &[f64]) -> Result<Vec<f64>>;

    /// Elementwise ratio `a / b`.
    fn series_relation(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>>;

    /// Relative change between samples `increment` apart.
    fn percent_change(&self, values: &[f64], increment: usize) -> Result<Vec<f64>>;

    /// Absolute change between samples `increment` apart.
    fn change(&self, values: &[f64], increment: usize) -> Result<Vec<f64>>;

    /// Divide every value by `x`.
    fn normalize_to_x(&self, values: &[f64], x: f64) -> Result<Vec<f64>>;

    /// Gaussian-kernel 2-D density estimate over aligned samples, evaluated
    /// on a `bins` x `bins` grid.
    fn kernel_density_estimation(
        &self,
        x: &[f64],
        y: &[f64],
        bins: usize,
    ) -> Result<DistributionTensor>;

    /// Elementwise maximum of two aligned arrays.
    fn maximum_vector(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>>;

    fn gaussian_distribution(&self, values: &[f64]) -> Result<GaussianFit>;

    fn beta_distribution(&self, values: &[f64]) -> Result<BetaFit>;

    /// CDF of a gaussian fit to `values`, evaluated at `point`.
    fn p_on_gaussian(&self, values: &[f64], point: f64) -> Result<f64>;

    /// PDF of a gaussian fit to `values`, evaluated at `point`.
    fn pdf_on_gaussian(&self, values: &[f64], point: f64) -> Result<f64>;

    /// Forward path of `horizon + 1` values (anchor included), stepping by
    /// the return at `spec.quantile` of the fitted change distribution.
    fn distributive_gaussian_projection(
        &self,
        values: &[f64],
        spec: &ProjectionSpec,
        horizon: usize,
    ) -> Result<Vec<f64>>;
}
