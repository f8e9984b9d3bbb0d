//! Matrix provider trait and the paired distance/time matrices.

use serde::{Deserialize, Serialize};

use super::error::MatrixError;

/// Square adjacency matrix; `matrix[i][j]` is the value from node `i` to
/// node `j` in the caller's index order.
pub type Matrix = Vec<Vec<i64>>;

/// Paired distance (meters) and time (seconds) matrices over one index
/// space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelMatrices {
    /// Pairwise distances in meters.
    pub distance_m: Matrix,
    /// Pairwise travel times in seconds.
    pub time_sec: Matrix,
}

impl TravelMatrices {
    /// Ensure both matrices are square over `nodes` entries.
    pub fn validate(&self, nodes: usize) -> Result<(), MatrixError> {
        let square = |matrix: &Matrix| {
            matrix.len() == nodes && matrix.iter().all(|row| row.len() == nodes)
        };
        if square(&self.distance_m) && square(&self.time_sec) {
            Ok(())
        } else {
            Err(MatrixError::NotSquare { expected: nodes })
        }
    }
}

/// Fetch pairwise travel distances and times for a set of nodes.
///
/// Implementers must return matrices that are square over `node_ids.len()`
/// and must return `Err(MatrixError::EmptyInput)` when `node_ids` is empty.
///
/// # Examples
///
/// ```rust
/// use dispatch_core::{Matrix, MatrixError, MatrixProvider, TravelMatrices};
///
/// struct UnitProvider;
///
/// impl MatrixProvider for UnitProvider {
///     fn travel_matrices(&self, node_ids: &[u64]) -> Result<TravelMatrices, MatrixError> {
///         if node_ids.is_empty() {
///             return Err(MatrixError::EmptyInput);
///         }
///         let n = node_ids.len();
///         let edges = |unit: i64| -> Matrix {
///             (0..n)
///                 .map(|i| (0..n).map(|j| if i == j { 0 } else { unit }).collect())
///                 .collect()
///         };
///         Ok(TravelMatrices {
///             distance_m: edges(1000),
///             time_sec: edges(60),
///         })
///     }
/// }
///
/// let matrices = UnitProvider.travel_matrices(&[500, 900])?;
/// assert_eq!(matrices.distance_m[0][1], 1000);
/// # Ok::<(), MatrixError>(())
/// ```
pub trait MatrixProvider: Send + Sync {
    /// Return distance and time matrices over `node_ids`, in order.
    fn travel_matrices(&self, node_ids: &[u64]) -> Result<TravelMatrices, MatrixError>;
}
