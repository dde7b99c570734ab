//! Distribution fits, probability queries and forward projections.

use chrono::Duration;

use crate::analysis::engine::{BetaFit, GaussianFit, ProjectionSpec};
use crate::analysis::AnalysisEngine;
use crate::cache::CacheStore;
use crate::config::ANALYSIS;
use crate::domain::{DistributionTensor, TimeSeries};
use crate::errors::Result;
use crate::orchestrator::DerivationOrchestrator;

impl<E: AnalysisEngine, C: CacheStore> DerivationOrchestrator<E, C> {
    /// [`kernel_density_estimation`] at the configured grid resolution.
    ///
    /// [`kernel_density_estimation`]: Self::kernel_density_estimation
    pub fn kernel_density_estimation_default(
        &self,
        x_series: &TimeSeries,
        y_series: &TimeSeries,
    ) -> Result<DistributionTensor> {
        self.kernel_density_estimation(
            x_series,
            y_series,
            ANALYSIS.distribution.default_kde_bins,
        )
    }

    /// 2-D kernel density estimate over two aligned series.
    pub fn kernel_density_estimation(
        &self,
        x_series: &TimeSeries,
        y_series: &TimeSeries,
        nbins: usize,
    ) -> Result<DistributionTensor> {
        self.engine
            .kernel_density_estimation(x_series.values(), y_series.values(), nbins)
    }

    /// 1-D density slice at a query value on the tensor's x axis.
    pub fn get_distribution_slice(
        &self,
        tensor: &DistributionTensor,
        x_value: f64,
    ) -> Result<Vec<f64>> {
        Ok(tensor.slice_at(x_value)?.to_vec())
    }

    /// Elementwise maximum of two aligned series' values.
    pub fn get_maximum_vector(
        &self,
        x_series: &TimeSeries,
        y_series: &TimeSeries,
    ) -> Result<Vec<f64>> {
        self.engine
            .maximum_vector(x_series.values(), y_series.values())
    }

    pub fn get_gaussian_distribution(&self, series: &TimeSeries) -> Result<GaussianFit> {
        self.engine.gaussian_distribution(series.values())
    }

    pub fn get_beta_distribution(&self, series: &TimeSeries) -> Result<BetaFit> {
        self.engine.beta_distribution(series.values())
    }

    /// CDF of a gaussian fit to the whole series, evaluated at the value on
    /// `date_index` (default: most recent).
    pub fn get_p_on_gaussian(
        &self,
        series: &TimeSeries,
        date_index: Option<usize>,
    ) -> Result<f64> {
        let point = series.value_at(date_index)?;
        self.engine.p_on_gaussian(series.values(), point)
    }

    /// PDF of a gaussian fit to the whole series, evaluated at the value on
    /// `date_index` (default: most recent).
    pub fn get_pdf_on_gaussian(
        &self,
        series: &TimeSeries,
        date_index: Option<usize>,
    ) -> Result<f64> {
        let point = series.value_at(date_index)?;
        self.engine.pdf_on_gaussian(series.values(), point)
    }

    /// Forward path of `forward_length + 1` values anchored at the final
    /// observation, dated daily from the final date.
    pub fn get_distributive_gaussian_projection(
        &self,
        series: &TimeSeries,
        spec: &ProjectionSpec,
        forward_length: usize,
    ) -> Result<TimeSeries> {
        let values =
            self.engine
                .distributive_gaussian_projection(series.values(), spec, forward_length)?;
        let anchor = series.last_date();
        let dates = (0..=forward_length as i64)
            .map(|offset| anchor + Duration::days(offset))
            .collect();
        let name = format!("{} {} day projection", series.name(), forward_length);
        TimeSeries::new(dates, name, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeriveError;
    use chrono::NaiveDate;

    fn daily_series(name: &str, values: Vec<f64>) -> TimeSeries {
        let dates = (1..=values.len() as u32)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        TimeSeries::new(dates, name, values).unwrap()
    }

    #[test]
    fn test_kde_and_slice() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let x = daily_series("AAPL", vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = daily_series("SPY", vec![2.0, 3.0, 5.0, 4.0, 6.0]);

        let tensor = orchestrator.kernel_density_estimation(&x, &y, 32).unwrap();
        let slice = orchestrator.get_distribution_slice(&tensor, 3.0).unwrap();
        assert_eq!(slice.len(), 32);
        assert!(slice.iter().all(|d| d.is_finite() && *d >= 0.0));
    }

    #[test]
    fn test_slice_outside_grid_is_an_error() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let x = daily_series("AAPL", vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = daily_series("SPY", vec![2.0, 3.0, 5.0, 4.0, 6.0]);
        let tensor = orchestrator.kernel_density_estimation(&x, &y, 32).unwrap();

        let result = orchestrator.get_distribution_slice(&tensor, 99.0);
        assert!(
            matches!(result, Err(DeriveError::Computation { .. })),
            "out-of-range queries must fail, not clamp"
        );
    }

    #[test]
    fn test_maximum_vector() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let a = daily_series("AAPL", vec![1.0, 5.0, 2.0]);
        let b = daily_series("SPY", vec![3.0, 4.0, 2.5]);
        let max = orchestrator.get_maximum_vector(&a, &b).unwrap();
        assert_eq!(max, vec![3.0, 5.0, 2.5]);
    }

    #[test]
    fn test_p_on_gaussian_defaults_to_latest() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        // Latest value sits above the mean -> CDF beyond 0.5
        let p_latest = orchestrator.get_p_on_gaussian(&series, None).unwrap();
        assert!(p_latest > 0.5);

        // The mean value itself sits at exactly 0.5
        let p_mid = orchestrator.get_p_on_gaussian(&series, Some(2)).unwrap();
        assert!((p_mid - 0.5).abs() < 1e-9);

        let pdf = orchestrator.get_pdf_on_gaussian(&series, None).unwrap();
        assert!(pdf > 0.0);
    }

    #[test]
    fn test_projection_dates_and_name() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", vec![100.0, 103.0, 101.0, 105.0, 108.0]);
        let projection = orchestrator
            .get_distributive_gaussian_projection(&series, &ProjectionSpec::default(), 5)
            .unwrap();

        assert_eq!(projection.len(), 6, "forward_length + 1 values");
        assert_eq!(projection.name(), "AAPL 5 day projection");
        assert_eq!(projection.first_date(), series.last_date());
        assert_eq!(
            projection.last_date(),
            series.last_date() + Duration::days(5)
        );
        assert!((projection.values()[0] - 108.0).abs() < 1e-12);
    }
}
