//! Uncached regression, normalization and stride transforms.
//!
//! These are pure: every one returns a new owned series and leaves its
//! input untouched.

use chrono::NaiveDate;
use itertools::izip;

use crate::analysis::AnalysisEngine;
use crate::cache::CacheStore;
use crate::config::ANALYSIS;
use crate::domain::TimeSeries;
use crate::errors::{DeriveError, Result};
use crate::orchestrator::DerivationOrchestrator;

impl<E: AnalysisEngine, C: CacheStore> DerivationOrchestrator<E, C> {
    /// [`percent_change_series`] at the configured default increment.
    ///
    /// [`percent_change_series`]: Self::percent_change_series
    pub fn percent_change_series_default(&self, series: &TimeSeries) -> Result<TimeSeries> {
        self.percent_change_series(series, ANALYSIS.stride.default_increment)
    }

    /// Fit a line against the positional index 0..n-1 and return the fitted
    /// values under the original name and dates.
    pub fn linear_regress_time_series(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let index: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
        let fitted = self.engine.linear_regress(&index, series.values())?;
        TimeSeries::new(series.dates().to_vec(), series.name(), fitted)
    }

    /// Fit one series' values against another's values (not against the
    /// index), aligned to the first series' dates.
    pub fn linear_regress_series(
        &self,
        series_x: &TimeSeries,
        series_y: &TimeSeries,
    ) -> Result<TimeSeries> {
        let fitted = self.engine.linear_regress(series_y.values(), series_x.values())?;
        let name = format!(
            "{}'s linear relationship to {}",
            series_x.name(),
            series_y.name()
        );
        TimeSeries::new(series_x.dates().to_vec(), name, fitted)
    }

    /// Actual minus fitted, on the original date axis.
    pub fn get_divergence_from_linear_regression(
        &self,
        series: &TimeSeries,
    ) -> Result<TimeSeries> {
        let fitted = self.linear_regress_time_series(series)?;
        let divergence = izip!(series.values(), fitted.values())
            .map(|(actual, fit)| actual - fit)
            .collect();
        let name = format!("{} divergence from linear regression", series.name());
        TimeSeries::new(series.dates().to_vec(), name, divergence)
    }

    /// Divide the series by its own regression fit normalized to the
    /// latest value. Returns a new series under the original name.
    pub fn adjust_by_linear_regression(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let fitted = self.linear_regress_time_series(series)?;
        let normalized_fit = self.normalize_to_latest(&fitted)?;
        let adjusted = izip!(series.values(), normalized_fit.values())
            .map(|(value, fit)| {
                if *fit == 0.0 {
                    Err(DeriveError::computation(
                        "regression fit crosses zero, adjustment undefined",
                    ))
                } else {
                    Ok(value / fit)
                }
            })
            .collect::<Result<Vec<f64>>>()?;
        TimeSeries::new(series.dates().to_vec(), series.name(), adjusted)
    }

    /// Divide every value by the final one, so the last point equals 1.
    pub fn normalize_to_latest(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let normalized = self
            .engine
            .normalize_to_x(series.values(), series.last_value())?;
        let name = format!("{} normalized to latest value", series.name());
        TimeSeries::new(series.dates().to_vec(), name, normalized)
    }

    /// Relative change between samples `days_increment` apart, on the
    /// subsampled date axis with its first element dropped.
    pub fn percent_change_series(
        &self,
        series: &TimeSeries,
        days_increment: usize,
    ) -> Result<TimeSeries> {
        let changes = self.engine.percent_change(series.values(), days_increment)?;
        let dates = strided_dates(series, days_increment, changes.len());
        TimeSeries::new(dates, series.name(), changes)
    }

    /// Absolute change between samples `days_increment` apart.
    pub fn change_series(
        &self,
        series: &TimeSeries,
        days_increment: usize,
    ) -> Result<TimeSeries> {
        let changes = self.engine.change(series.values(), days_increment)?;
        let dates = strided_dates(series, days_increment, changes.len());
        TimeSeries::new(dates, series.name(), changes)
    }
}

/// Every `increment`-th date with the first dropped: the first change has
/// no valid predecessor pairing on the subsampled axis.
fn strided_dates(series: &TimeSeries, increment: usize, rows: usize) -> Vec<NaiveDate> {
    series
        .dates()
        .iter()
        .step_by(increment)
        .skip(1)
        .take(rows)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily_series(name: &str, values: Vec<f64>) -> TimeSeries {
        let dates = (1..=values.len() as u32)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        TimeSeries::new(dates, name, values).unwrap()
    }

    #[test]
    fn test_regress_time_series_keeps_identity() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", vec![1.0, 3.0, 5.0, 7.0]);
        let fitted = orchestrator.linear_regress_time_series(&series).unwrap();

        assert_eq!(fitted.name(), "AAPL");
        assert_eq!(fitted.dates(), series.dates());
        // An exact line regresses onto itself
        for (fit, actual) in fitted.values().iter().zip(series.values()) {
            assert!((fit - actual).abs() < 1e-10);
        }
    }

    #[test]
    fn test_regress_series_name_records_relationship() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let a = daily_series("AAPL", vec![2.0, 4.0, 6.0]);
        let b = daily_series("SPY", vec![1.0, 2.0, 3.0]);
        let fitted = orchestrator.linear_regress_series(&a, &b).unwrap();

        assert_eq!(fitted.name(), "AAPL's linear relationship to SPY");
        assert_eq!(fitted.dates(), a.dates());
        for (fit, actual) in fitted.values().iter().zip(a.values()) {
            assert!((fit - actual).abs() < 1e-10);
        }
    }

    #[test]
    fn test_divergence_is_actual_minus_fitted() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", vec![1.0, 2.5, 2.0, 4.0, 4.5]);
        let fitted = orchestrator.linear_regress_time_series(&series).unwrap();
        let divergence = orchestrator
            .get_divergence_from_linear_regression(&series)
            .unwrap();

        assert_eq!(divergence.name(), "AAPL divergence from linear regression");
        assert_eq!(divergence.dates(), series.dates());
        for (d, (actual, fit)) in divergence
            .values()
            .iter()
            .zip(series.values().iter().zip(fitted.values()))
        {
            assert!((d - (actual - fit)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_normalize_to_latest_ends_at_one() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", vec![5.0, 10.0, 20.0]);
        let normalized = orchestrator.normalize_to_latest(&series).unwrap();

        assert_eq!(normalized.name(), "AAPL normalized to latest value");
        assert!((normalized.last_value() - 1.0).abs() < 1e-12);
        assert!((normalized.values()[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_adjust_by_linear_regression_is_pure() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", vec![10.0, 12.0, 11.0, 14.0, 15.0]);
        let before = series.clone();

        let adjusted = orchestrator.adjust_by_linear_regression(&series).unwrap();
        assert_eq!(series, before, "the input series must not be mutated");
        assert_eq!(adjusted.name(), "AAPL");
        assert_eq!(adjusted.dates(), series.dates());
        // The fit is normalized to its own latest value, so the final
        // adjusted value equals the final actual value.
        assert!((adjusted.last_value() - series.last_value()).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_series_stride() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        // n = 11, k = 5 -> floor(10 / 5) = 2 rows
        let series = daily_series("AAPL", (1..=11).map(|v| v as f64).collect());
        let changes = orchestrator.percent_change_series(&series, 5).unwrap();

        assert_eq!(changes.len(), 2);
        // Subsampled axis is dates[0], dates[5], dates[10]; first is dropped
        assert_eq!(changes.dates()[0], series.dates()[5]);
        assert_eq!(changes.dates()[1], series.dates()[10]);
        assert!((changes.values()[0] - 5.0).abs() < 1e-12); // (6 - 1) / 1
        assert!((changes.values()[1] - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_change_series_stride() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", (0..9).map(|v| (v * v) as f64).collect());
        // n = 9, k = 4 -> floor(8 / 4) = 2 rows
        let changes = orchestrator.change_series(&series, 4).unwrap();

        assert_eq!(changes.len(), 2);
        assert!((changes.values()[0] - 16.0).abs() < 1e-12); // 16 - 0
        assert!((changes.values()[1] - 48.0).abs() < 1e-12); // 64 - 16
    }

    #[test]
    fn test_stride_larger_than_series_fails() {
        let orchestrator = DerivationOrchestrator::with_defaults();
        let series = daily_series("AAPL", vec![1.0, 2.0, 3.0]);
        assert!(orchestrator.percent_change_series(&series, 5).is_err());
    }
}
