//! Index-difference placeholder matrices.

use super::error::MatrixError;
use super::provider::{Matrix, MatrixProvider, TravelMatrices};

/// Placeholder provider deriving pseudo-distances from index differences.
///
/// Edge `(i, j)` costs `|i - j|` steps, scaled by the configured meters and
/// seconds per step. This stands in for a real geospatial matrix service;
/// production deployments implement [`MatrixProvider`] against one and keep
/// the rest of the engine unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearMatrixProvider {
    /// Distance per index step.
    pub meters_per_step: i64,
    /// Travel time per index step.
    pub seconds_per_step: i64,
}

impl Default for LinearMatrixProvider {
    fn default() -> Self {
        Self {
            meters_per_step: 1000,
            seconds_per_step: 120,
        }
    }
}

impl LinearMatrixProvider {
    fn scaled(&self, n: usize, unit: i64) -> Matrix {
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| (i as i64 - j as i64).abs() * unit)
                    .collect()
            })
            .collect()
    }
}

impl MatrixProvider for LinearMatrixProvider {
    fn travel_matrices(&self, node_ids: &[u64]) -> Result<TravelMatrices, MatrixError> {
        if node_ids.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        let n = node_ids.len();
        Ok(TravelMatrices {
            distance_m: self.scaled(n, self.meters_per_step),
            time_sec: self.scaled(n, self.seconds_per_step),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_grow_with_index_difference() {
        let provider = LinearMatrixProvider::default();
        let matrices = provider.travel_matrices(&[10, 20, 30]).unwrap();
        assert_eq!(matrices.distance_m[0][0], 0);
        assert_eq!(matrices.distance_m[0][2], 2000);
        assert_eq!(matrices.distance_m[2][0], 2000);
        assert_eq!(matrices.time_sec[0][1], 120);
        assert!(matrices.validate(3).is_ok());
    }

    #[test]
    fn errors_on_empty_input() {
        let provider = LinearMatrixProvider::default();
        assert_eq!(
            provider.travel_matrices(&[]),
            Err(MatrixError::EmptyInput)
        );
    }
}
