use thiserror::Error;

/// Errors from [`crate::matrix::MatrixProvider::travel_matrices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// No nodes were provided.
    ///
    /// Providers require at least one node to compute a matrix. Callers
    /// should pre-filter input to avoid this condition.
    #[error("at least one node is required")]
    EmptyInput,
    /// A provider returned matrices that are not square over the requested
    /// node count.
    #[error("provider returned a non-square matrix for {expected} nodes")]
    NotSquare {
        /// Number of nodes the matrices were requested for.
        expected: usize,
    },
}
