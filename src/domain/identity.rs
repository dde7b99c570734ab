//! Structured cache keys for derived series.
//!
//! Every cached derivation is identified by the operation, its parameters,
//! and the input series' identity metadata. Keeping the parameters in a
//! typed key (rather than baked into a display string) makes collisions
//! impossible by construction: two keys compare equal iff the operation,
//! all parameters, and the input identity match exactly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::series::TimeSeries;

/// Position direction for return calculations.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Long,
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

/// The cached operations and their parameters.
///
/// Leverage is stored as raw f64 bits so the key derives Eq/Hash exactly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    MeanReturn {
        days_view: usize,
        direction: Direction,
        leverage_bits: u64,
    },
    DivergenceProbability {
        days_view: usize,
    },
    Relation {
        other_name: String,
    },
}

impl Operation {
    pub fn mean_return(days_view: usize, direction: Direction, leverage: f64) -> Self {
        Operation::MeanReturn {
            days_view,
            direction,
            leverage_bits: leverage.to_bits(),
        }
    }

    pub fn divergence_probability(days_view: usize) -> Self {
        Operation::DivergenceProbability { days_view }
    }

    pub fn relation(other_name: impl Into<String>) -> Self {
        Operation::Relation {
            other_name: other_name.into(),
        }
    }
}

/// Canonical identity of a derived series: operation + input identity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivativeKey {
    pub series_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub operation: Operation,
}

impl DerivativeKey {
    pub fn for_series(series: &TimeSeries, operation: Operation) -> Self {
        let (name, start_date, end_date) = series.meta_values();
        DerivativeKey {
            series_name: name.to_string(),
            start_date,
            end_date,
            operation,
        }
    }

    /// Human-readable derivative name, used as the display name of the
    /// materialized series. Deterministic for a given key.
    pub fn display_name(&self) -> String {
        match &self.operation {
            Operation::MeanReturn {
                days_view,
                direction,
                leverage_bits,
            } => {
                let leverage = f64::from_bits(*leverage_bits);
                let mut name = format!(
                    "Mean return of {} investment in {} over {} days",
                    direction, self.series_name, days_view
                );
                if leverage != 1.0 {
                    name.push_str(&format!(" leveraged * {}", leverage));
                }
                name
            }
            Operation::DivergenceProbability { days_view } => format!(
                "Probability of {} divergence from {} day linear regression",
                self.series_name, days_view
            ),
            Operation::Relation { other_name } => {
                format!("{} / {}", self.series_name, other_name)
            }
        }
    }
}
