use serde::{Deserialize, Serialize};

use crate::errors::{DeriveError, Result};

/// Output of a 2-D density estimate: co-indexed coordinate grids plus the
/// density surface. `z[i][j]` is the density at `(x[i], y[j])`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DistributionTensor {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<Vec<f64>>,
}

impl DistributionTensor {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<Vec<f64>>) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(DeriveError::computation("distribution tensor has empty axes"));
        }
        if z.len() != x.len() || z.iter().any(|row| row.len() != y.len()) {
            return Err(DeriveError::computation(format!(
                "density surface shape does not match axes ({} x {})",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { x, y, z })
    }

    pub fn x_axis(&self) -> &[f64] {
        &self.x
    }

    pub fn y_axis(&self) -> &[f64] {
        &self.y
    }

    pub fn density(&self) -> &[Vec<f64>] {
        &self.z
    }

    /// Density row for the x-grid point nearest to `x_value`.
    ///
    /// A query outside the grid range is an error, never a clamp: silently
    /// snapping to the boundary would return a density for a point the
    /// estimate knows nothing about.
    pub fn slice_at(&self, x_value: f64) -> Result<&[f64]> {
        let first = self.x[0];
        let last = self.x[self.x.len() - 1];
        if x_value < first || x_value > last {
            return Err(DeriveError::computation(format!(
                "query value {x_value} outside x-grid range [{first}, {last}]"
            )));
        }
        let upper = self
            .x
            .iter()
            .position(|&grid| grid >= x_value)
            .unwrap_or(self.x.len() - 1);
        // Snap to whichever neighbouring grid point is closer; ties round up
        let idx = if upper > 0 && x_value - self.x[upper - 1] < self.x[upper] - x_value {
            upper - 1
        } else {
            upper
        };
        Ok(&self.z[idx])
    }
}
