//! The normalized routing-problem encoding consumed by optimizers.

use std::collections::HashMap;

use crate::{PlanKey, SolveOptions, TaskNode, TravelMatrices, VehicleResource};

/// Bidirectional mapping between domain node ids and dense matrix indices.
///
/// Nodes are indexed in first-seen order and deduplicated, so every node
/// referenced by a vehicle or task appears exactly once.
///
/// # Examples
///
/// ```
/// use dispatch_core::NodeIndex;
///
/// let mut nodes = NodeIndex::new();
/// assert_eq!(nodes.insert(500), 0);
/// assert_eq!(nodes.insert(900), 1);
/// assert_eq!(nodes.insert(500), 0); // deduplicated
/// assert_eq!(nodes.index_of(900), Some(1));
/// assert_eq!(nodes.node_at(1), Some(900));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIndex {
    ids: Vec<u64>,
    indices: HashMap<u64, usize>,
}

impl NodeIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for a solve: every vehicle start and end depot, then
    /// every task node, in first-seen order.
    pub fn for_inputs(vehicles: &[VehicleResource], tasks: &[TaskNode]) -> Self {
        let mut nodes = Self::new();
        for vehicle in vehicles {
            nodes.insert(vehicle.start_node_id);
            nodes.insert(vehicle.end_node_id);
        }
        for task in tasks {
            nodes.insert(task.node_id);
        }
        nodes
    }

    /// Insert `node_id`, returning its index; existing nodes keep theirs.
    pub fn insert(&mut self, node_id: u64) -> usize {
        if let Some(&index) = self.indices.get(&node_id) {
            return index;
        }
        let index = self.ids.len();
        self.ids.push(node_id);
        self.indices.insert(node_id, index);
        index
    }

    /// Dense index for a node id, if mapped.
    pub fn index_of(&self, node_id: u64) -> Option<usize> {
        self.indices.get(&node_id).copied()
    }

    /// Node id at a dense index, if in range.
    pub fn node_at(&self, index: usize) -> Option<u64> {
        self.ids.get(index).copied()
    }

    /// Node ids in index order; matrices are built over this ordering.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no node has been inserted.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Everything an optimizer needs for one solve.
///
/// Single-owner and pipeline-local: assembled per run and never shared
/// across concurrent solves.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingProblem {
    /// Plan being solved.
    pub key: PlanKey,
    /// Participating vehicles.
    pub vehicles: Vec<VehicleResource>,
    /// Participating tasks.
    pub tasks: Vec<TaskNode>,
    /// Node id <-> matrix index mapping.
    pub nodes: NodeIndex,
    /// Square distance and time matrices over the index space.
    pub matrices: TravelMatrices,
    /// Effective solve configuration.
    pub options: SolveOptions,
}
