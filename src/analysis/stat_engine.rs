//! Default [`AnalysisEngine`] backed by statrs.

use argminmax::ArgMinMax;
use itertools::izip;
use statrs::distribution::{Beta, Continuous, ContinuousCDF, Normal};

use crate::analysis::engine::{AnalysisEngine, BetaFit, GaussianFit, ProjectionSpec};
use crate::domain::{Direction, DistributionTensor};
use crate::errors::{DeriveError, Result};

/// Stateless statrs-backed implementation of the numeric contract.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatEngine;

fn get_max(vec: &[f64]) -> f64 {
    vec[vec.argmax()]
}

fn get_min(vec: &[f64]) -> f64 {
    vec[vec.argmin()]
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

fn ensure_aligned(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(DeriveError::schema(format!(
            "arrays of length {} and {} are not aligned",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

impl StatEngine {
    fn fit_gaussian(&self, values: &[f64]) -> Result<Normal> {
        let fit = self.gaussian_distribution(values)?;
        Normal::new(fit.mean, fit.std_dev)
            .map_err(|err| DeriveError::computation(format!("gaussian fit rejected: {err}")))
    }
}

impl AnalysisEngine for StatEngine {
    fn mean_return(&self, window: &[f64], direction: Direction, leverage: f64) -> Result<f64> {
        if window.len() < 2 {
            return Err(DeriveError::computation(format!(
                "return window needs at least 2 values, got {}",
                window.len()
            )));
        }
        let first = window[0];
        if first == 0.0 {
            return Err(DeriveError::computation(
                "return window starts at zero, return undefined",
            ));
        }
        let realized = window[window.len() - 1] / first - 1.0;
        let signed = match direction {
            Direction::Long => realized,
            Direction::Short => -realized,
        };
        Ok(signed * leverage)
    }

    fn linear_regress(&self, independent: &[f64], dependent: &[f64]) -> Result<Vec<f64>> {
        ensure_aligned(independent, dependent)?;
        if independent.len() < 2 {
            return Err(DeriveError::computation(
                "regression needs at least 2 observations",
            ));
        }
        let mx = mean(independent);
        let my = mean(dependent);
        let mut ss_xx = 0.0;
        let mut ss_xy = 0.0;
        for (&x, &y) in independent.iter().zip(dependent) {
            ss_xx += (x - mx) * (x - mx);
            ss_xy += (x - mx) * (y - my);
        }
        if ss_xx == 0.0 {
            return Err(DeriveError::computation(
                "degenerate regression: independent variable has zero variance",
            ));
        }
        let slope = ss_xy / ss_xx;
        let intercept = my - slope * mx;
        Ok(independent.iter().map(|&x| intercept + slope * x).collect())
    }

    fn series_relation(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        ensure_aligned(a, b)?;
        izip!(a, b)
            .map(|(&num, &den)| {
                if den == 0.0 {
                    Err(DeriveError::computation(
                        "series relation divides by a zero value",
                    ))
                } else {
                    Ok(num / den)
                }
            })
            .collect()
    }

    fn percent_change(&self, values: &[f64], increment: usize) -> Result<Vec<f64>> {
        let strided = self.change(values, increment)?;
        let m = strided.len();
        (0..m)
            .map(|j| {
                let base = values[j * increment];
                if base == 0.0 {
                    Err(DeriveError::computation(
                        "percent change over a zero base value",
                    ))
                } else {
                    Ok(strided[j] / base)
                }
            })
            .collect()
    }

    fn change(&self, values: &[f64], increment: usize) -> Result<Vec<f64>> {
        if increment == 0 {
            return Err(DeriveError::computation("change increment must be positive"));
        }
        if values.len() <= increment {
            return Err(DeriveError::computation(format!(
                "increment {} leaves no change pairs in {} values",
                increment,
                values.len()
            )));
        }
        let m = (values.len() - 1) / increment;
        Ok((0..m)
            .map(|j| values[(j + 1) * increment] - values[j * increment])
            .collect())
    }

    fn normalize_to_x(&self, values: &[f64], x: f64) -> Result<Vec<f64>> {
        if x == 0.0 || !x.is_finite() {
            return Err(DeriveError::computation(format!(
                "cannot normalize to {x}"
            )));
        }
        Ok(values.iter().map(|v| v / x).collect())
    }

    fn kernel_density_estimation(
        &self,
        x: &[f64],
        y: &[f64],
        bins: usize,
    ) -> Result<DistributionTensor> {
        ensure_aligned(x, y)?;
        if bins < 2 {
            return Err(DeriveError::computation(format!(
                "density estimate needs at least 2 bins, got {bins}"
            )));
        }
        if x.len() < 2 {
            return Err(DeriveError::computation(
                "density estimate needs at least 2 samples",
            ));
        }

        let n = x.len() as f64;
        // Scott's rule bandwidth for a 2-D gaussian product kernel
        let bandwidth = |values: &[f64]| -> Result<f64> {
            let sigma = std_dev(values);
            if sigma == 0.0 {
                return Err(DeriveError::computation(
                    "density estimate over constant values",
                ));
            }
            Ok(sigma * n.powf(-1.0 / 6.0))
        };
        let hx = bandwidth(x)?;
        let hy = bandwidth(y)?;

        let grid = |values: &[f64]| -> Vec<f64> {
            let lo = get_min(values);
            let hi = get_max(values);
            let step = (hi - lo) / (bins - 1) as f64;
            (0..bins).map(|i| lo + i as f64 * step).collect()
        };
        let x_grid = grid(x);
        let y_grid = grid(y);

        let norm = 1.0 / (n * 2.0 * std::f64::consts::PI * hx * hy);
        let z = x_grid
            .iter()
            .map(|&gx| {
                y_grid
                    .iter()
                    .map(|&gy| {
                        let sum: f64 = izip!(x, y)
                            .map(|(&sx, &sy)| {
                                let dx = (gx - sx) / hx;
                                let dy = (gy - sy) / hy;
                                (-0.5 * (dx * dx + dy * dy)).exp()
                            })
                            .sum();
                        norm * sum
                    })
                    .collect()
            })
            .collect();

        DistributionTensor::new(x_grid, y_grid, z)
    }

    fn maximum_vector(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        ensure_aligned(a, b)?;
        Ok(izip!(a, b).map(|(&x, &y)| x.max(y)).collect())
    }

    fn gaussian_distribution(&self, values: &[f64]) -> Result<GaussianFit> {
        if values.len() < 2 {
            return Err(DeriveError::computation(
                "gaussian fit needs at least 2 values",
            ));
        }
        let sigma = std_dev(values);
        if sigma == 0.0 {
            return Err(DeriveError::computation(
                "gaussian fit over constant values",
            ));
        }
        Ok(GaussianFit {
            mean: mean(values),
            std_dev: sigma,
        })
    }

    fn beta_distribution(&self, values: &[f64]) -> Result<BetaFit> {
        if values.len() < 2 {
            return Err(DeriveError::computation("beta fit needs at least 2 values"));
        }
        if values.iter().any(|&v| !(0.0..=1.0).contains(&v)) {
            return Err(DeriveError::computation(
                "beta fit requires values within [0, 1]",
            ));
        }
        // Method of moments
        let m = mean(values);
        let v = {
            let s = std_dev(values);
            s * s
        };
        if v == 0.0 {
            return Err(DeriveError::computation("beta fit over constant values"));
        }
        let common = m * (1.0 - m) / v - 1.0;
        let alpha = m * common;
        let beta = (1.0 - m) * common;
        Beta::new(alpha, beta)
            .map_err(|err| DeriveError::computation(format!("beta fit rejected: {err}")))?;
        Ok(BetaFit { alpha, beta })
    }

    fn p_on_gaussian(&self, values: &[f64], point: f64) -> Result<f64> {
        Ok(self.fit_gaussian(values)?.cdf(point))
    }

    fn pdf_on_gaussian(&self, values: &[f64], point: f64) -> Result<f64> {
        Ok(self.fit_gaussian(values)?.pdf(point))
    }

    fn distributive_gaussian_projection(
        &self,
        values: &[f64],
        spec: &ProjectionSpec,
        horizon: usize,
    ) -> Result<Vec<f64>> {
        if !(spec.quantile > 0.0 && spec.quantile < 1.0) {
            return Err(DeriveError::computation(format!(
                "projection quantile {} outside (0, 1)",
                spec.quantile
            )));
        }
        if values.len() < 3 {
            return Err(DeriveError::computation(
                "projection needs at least 3 observed values",
            ));
        }
        let step_returns = self.percent_change(values, 1)?;

        // A flat return history fits no gaussian; project the constant drift.
        let step = match self.gaussian_distribution(&step_returns) {
            Ok(fit) => Normal::new(fit.mean, fit.std_dev)
                .map_err(|err| DeriveError::computation(format!("gaussian fit rejected: {err}")))?
                .inverse_cdf(spec.quantile),
            Err(_) => step_returns[0],
        };

        let anchor = values[values.len() - 1];
        let mut path = Vec::with_capacity(horizon + 1);
        path.push(anchor);
        for t in 0..horizon {
            path.push(path[t] * (1.0 + step));
        }
        Ok(path)
    }
}
