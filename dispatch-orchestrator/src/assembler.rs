//! Encoding of catalog data into a routing problem.

use std::sync::Arc;

use dispatch_core::{
    MatrixProvider, NodeIndex, PlanStore, RoutingProblem, Task, TaskNode, TaskStore, Vehicle,
    VehicleResource, VehicleStore,
};

use crate::error::AssemblyError;
use crate::service::SolveRequest;

/// Builds the normalized problem description for one solve.
///
/// Pure function of stored domain state: available vehicles and waiting
/// tasks are loaded (optionally restricted by the request's id filters),
/// every referenced node is indexed in first-seen order, and the matrix
/// provider is queried over exactly that index space.
pub struct ProblemAssembler {
    plans: Arc<dyn PlanStore>,
    tasks: Arc<dyn TaskStore>,
    vehicles: Arc<dyn VehicleStore>,
    matrix: Arc<dyn MatrixProvider>,
}

impl ProblemAssembler {
    /// Wire an assembler over the given stores and matrix provider.
    pub fn new(
        plans: Arc<dyn PlanStore>,
        tasks: Arc<dyn TaskStore>,
        vehicles: Arc<dyn VehicleStore>,
        matrix: Arc<dyn MatrixProvider>,
    ) -> Self {
        Self {
            plans,
            tasks,
            vehicles,
            matrix,
        }
    }

    /// Assemble the problem for `request`, resolving effective options from
    /// the request or, when it carries none, the plan's stored
    /// configuration.
    pub fn assemble(&self, request: &SolveRequest) -> Result<RoutingProblem, AssemblyError> {
        let key = request.key;
        let plan = self
            .plans
            .get(key)
            .ok_or(AssemblyError::PlanNotFound(key))?;

        let vehicles: Vec<VehicleResource> = self
            .vehicles
            .available(key.tenant_id, request.vehicle_ids.as_deref())
            .iter()
            .map(Vehicle::resource)
            .collect();
        if vehicles.is_empty() {
            return Err(AssemblyError::NoAvailableVehicles(key));
        }

        let tasks: Vec<TaskNode> = self
            .tasks
            .waiting(key, request.task_ids.as_deref())
            .iter()
            .map(Task::node)
            .collect();
        if tasks.is_empty() {
            return Err(AssemblyError::NoWaitingTasks(key));
        }

        let nodes = NodeIndex::for_inputs(&vehicles, &tasks);
        let matrices = self.matrix.travel_matrices(nodes.ids())?;
        matrices.validate(nodes.len())?;

        let options = request.options.unwrap_or(plan.options);
        log::debug!(
            "Assembled problem for plan {key}: {} vehicles, {} tasks, {} nodes",
            vehicles.len(),
            tasks.len(),
            nodes.len()
        );

        Ok(RoutingProblem {
            key,
            vehicles,
            tasks,
            nodes,
            matrices,
            options,
        })
    }
}
