//! The validated time-series record every derivation consumes and produces.

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::{DeriveError, Result};

/// A named, dated value sequence.
///
/// Invariants, enforced at construction: dates and values have equal,
/// non-zero length, and dates are strictly increasing. Transforms never
/// mutate a series in place; each one returns a new owned instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series, validating the record invariant.
    pub fn new(dates: Vec<NaiveDate>, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if dates.is_empty() {
            return Err(DeriveError::schema(format!("series '{}' is empty", name)));
        }
        if dates.len() != values.len() {
            return Err(DeriveError::schema(format!(
                "series '{}' has {} dates but {} values",
                name,
                dates.len(),
                values.len()
            )));
        }
        if !dates.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(DeriveError::schema(format!(
                "series '{}' has non-increasing dates",
                name
            )));
        }
        Ok(Self {
            name,
            dates,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        // Construction forbids empty series; kept for clippy's sake.
        self.dates.is_empty()
    }

    /// Identity metadata used to build cache keys: (name, first date, last date).
    pub fn meta_values(&self) -> (&str, NaiveDate, NaiveDate) {
        (&self.name, self.dates[0], self.dates[self.len() - 1])
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.len() - 1]
    }

    pub fn last_value(&self) -> f64 {
        self.values[self.len() - 1]
    }

    /// Value at a date index, defaulting to the most recent observation.
    pub fn value_at(&self, date_index: Option<usize>) -> Result<f64> {
        let idx = date_index.unwrap_or(self.len() - 1);
        self.values.get(idx).copied().ok_or_else(|| {
            DeriveError::computation(format!(
                "date index {} out of range for series '{}' of length {}",
                idx,
                self.name,
                self.len()
            ))
        })
    }

    /// New owned sub-series covering `[start, end)` of the date axis.
    pub fn window(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start >= end || end > self.len() {
            return Err(DeriveError::computation(format!(
                "window [{start}, {end}) invalid for series '{}' of length {}",
                self.name,
                self.len()
            )));
        }
        TimeSeries::new(
            self.dates[start..end].to_vec(),
            self.name.clone(),
            self.values[start..end].to_vec(),
        )
    }

    /// Same date axis check for binary operations.
    pub fn ensure_aligned_with(&self, other: &TimeSeries) -> Result<()> {
        if self.dates != other.dates {
            return Err(DeriveError::schema(format!(
                "series '{}' and '{}' do not share a date axis",
                self.name, other.name
            )));
        }
        Ok(())
    }
}
