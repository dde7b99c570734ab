//! Cache-aware windowed derivations.
//!
//! Each operation follows the same contract: build the structured key from
//! the input's identity metadata and the operation parameters, consult the
//! cache, and only on a miss run the window loop against the engine. The
//! loop's results are wrapped and inserted as one unit; a failure anywhere
//! in the loop aborts the derivation with no partial cache write.

use crate::analysis::AnalysisEngine;
use crate::cache::CacheStore;
use crate::config::ANALYSIS;
use crate::domain::{DerivativeKey, Direction, Operation, TimeSeries};
use crate::errors::{DeriveError, Result};
use crate::orchestrator::DerivationOrchestrator;

impl<E: AnalysisEngine, C: CacheStore> DerivationOrchestrator<E, C> {
    /// [`get_all_mean_returns`] with the configured default window and
    /// leverage.
    ///
    /// [`get_all_mean_returns`]: Self::get_all_mean_returns
    pub fn get_all_mean_returns_default(
        &self,
        series: &TimeSeries,
        direction: Direction,
    ) -> Result<TimeSeries> {
        self.get_all_mean_returns(
            series,
            ANALYSIS.returns.default_days_view,
            direction,
            ANALYSIS.returns.default_leverage,
        )
    }

    /// Rolling realized return over every full window of `days_view`
    /// samples. Output has `len - days_view` rows, dated to the window
    /// start dates.
    pub fn get_all_mean_returns(
        &self,
        series: &TimeSeries,
        days_view: usize,
        direction: Direction,
        leverage: f64,
    ) -> Result<TimeSeries> {
        if days_view < 2 || days_view >= series.len() {
            return Err(DeriveError::computation(format!(
                "days_view {} invalid for series '{}' of length {}",
                days_view,
                series.name(),
                series.len()
            )));
        }

        let key = DerivativeKey::for_series(
            series,
            Operation::mean_return(days_view, direction, leverage),
        );
        if self.cache.dates_are_unavailable(&key) {
            log::debug!("cache miss, computing '{}'", key.display_name());
            let rows = series.len() - days_view;
            let mut results = Vec::with_capacity(rows);
            for window in series.values().windows(days_view).take(rows) {
                results.push(self.engine.mean_return(window, direction, leverage)?);
            }
            let derived =
                TimeSeries::new(series.dates()[..rows].to_vec(), key.display_name(), results)?;
            self.persist(key, &derived);
            Ok(derived)
        } else {
            log::debug!("cache hit for '{}'", key.display_name());
            self.cache.select_derivative(&key)
        }
    }

    /// Signed probability of each day's divergence from a trailing
    /// `days_view`-day linear regression, one row per index from
    /// `days_view` to the end of the series.
    pub fn get_divergence_probability_series(
        &self,
        series: &TimeSeries,
        days_view: usize,
    ) -> Result<TimeSeries> {
        if days_view < 3 || days_view >= series.len() {
            return Err(DeriveError::computation(format!(
                "days_view {} invalid for series '{}' of length {}",
                days_view,
                series.name(),
                series.len()
            )));
        }

        let key =
            DerivativeKey::for_series(series, Operation::divergence_probability(days_view));
        if self.cache.dates_are_unavailable(&key) {
            log::debug!("cache miss, computing '{}'", key.display_name());
            let mut results = Vec::with_capacity(series.len() - days_view);
            for i in days_view..series.len() {
                results.push(self.divergence_probability_at(series, days_view, i)?);
            }
            let derived = TimeSeries::new(
                series.dates()[days_view..].to_vec(),
                key.display_name(),
                results,
            )?;
            self.persist(key, &derived);
            Ok(derived)
        } else {
            log::debug!("cache hit for '{}'", key.display_name());
            self.cache.select_derivative(&key)
        }
    }

    /// One evaluation window ending at `index`: regress the window against
    /// its positional axis, fit a gaussian to the window's divergences, and
    /// evaluate the final divergence's CDF under that fit. Positive when
    /// the actual value sits above the fitted line, negative below.
    fn divergence_probability_at(
        &self,
        series: &TimeSeries,
        days_view: usize,
        index: usize,
    ) -> Result<f64> {
        let window = series.window(index - days_view, index)?;
        let divergence = self.get_divergence_from_linear_regression(&window)?;
        let latest = divergence.last_value();
        let probability = self.engine.p_on_gaussian(divergence.values(), latest)?;
        let sign = if latest > 0.0 { 1.0 } else { -1.0 };
        Ok(probability * sign)
    }

    /// Elementwise ratio of two series sharing a date axis, named
    /// "{one} / {two}".
    pub fn get_series_relation(
        &self,
        series_one: &TimeSeries,
        series_two: &TimeSeries,
    ) -> Result<TimeSeries> {
        series_one.ensure_aligned_with(series_two)?;

        let key = DerivativeKey::for_series(series_one, Operation::relation(series_two.name()));
        if self.cache.dates_are_unavailable(&key) {
            log::debug!("cache miss, computing '{}'", key.display_name());
            let values = self
                .engine
                .series_relation(series_one.values(), series_two.values())?;
            let derived =
                TimeSeries::new(series_one.dates().to_vec(), key.display_name(), values)?;
            self.persist(key, &derived);
            Ok(derived)
        } else {
            log::debug!("cache hit for '{}'", key.display_name());
            self.cache.select_derivative(&key)
        }
    }
}
