//! The routing optimizer contract.

use thiserror::Error;

use crate::{RoutingProblem, SolveResult};

/// Errors returned by [`RoutingOptimizer::solve`].
///
/// Finding no solution is *not* an error; it is reported through
/// [`SolveResult::no_solution`](crate::SolveResult::no_solution). Errors are
/// reserved for problems that violate the encoding contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizerError {
    /// The problem encoding was malformed, e.g. non-square matrices or a
    /// depot missing from the node index.
    #[error("malformed routing problem: {0}")]
    MalformedProblem(String),
}

/// Search engine boundary: consume an encoded problem, return a solution or
/// a no-solution verdict.
///
/// Implementations must honor the arc-cost objective over the distance
/// matrix, per-vehicle capacity bounds, cumulative time (travel plus service)
/// bounded by task windows and vehicle shifts, the per-task drop disjunction
/// when the options allow it, and the wall-clock budget. Output must be
/// deterministic for a given problem. Implementations must be `Send + Sync`
/// so pooled workers can share them.
pub trait RoutingOptimizer: Send + Sync {
    /// Solve an encoded problem.
    fn solve(&self, problem: &RoutingProblem) -> Result<SolveResult, OptimizerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeIndex, PlanKey, SolveOptions, TravelMatrices};

    struct NoSolutionEngine;

    impl RoutingOptimizer for NoSolutionEngine {
        fn solve(&self, problem: &RoutingProblem) -> Result<SolveResult, OptimizerError> {
            Ok(SolveResult::no_solution(&problem.tasks))
        }
    }

    #[test]
    fn no_solution_flows_as_a_normal_result() {
        let problem = RoutingProblem {
            key: PlanKey::new(1, 1),
            vehicles: Vec::new(),
            tasks: Vec::new(),
            nodes: NodeIndex::new(),
            matrices: TravelMatrices::default(),
            options: SolveOptions::default(),
        };
        let result = NoSolutionEngine.solve(&problem).unwrap();
        assert!(!result.is_solved());
    }
}
