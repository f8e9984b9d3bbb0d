//! Behaviour tests for the insertion engine against the optimizer contract.

use std::time::Duration;

use dispatch_core::{
    LinearMatrixProvider, MatrixProvider, NodeIndex, OptimizerError, PlanKey, ResultStatus,
    RoutingOptimizer, RoutingProblem, SolveOptions, TaskNode, TravelMatrices, UnassignedReason,
    VehicleResource,
};
use dispatch_solver_insertion::InsertionOptimizer;
use rstest::rstest;

fn vehicle(id: u64) -> VehicleResource {
    VehicleResource {
        vehicle_id: id,
        start_node_id: 1,
        end_node_id: 1,
        capacity: 100,
        work_start_sec: 0,
        work_end_sec: 86_400,
    }
}

fn task(id: u64, node: u64) -> TaskNode {
    TaskNode {
        task_id: id,
        node_id: node,
        tw_start_sec: 0,
        tw_end_sec: 86_400,
        service_time_sec: 600,
        demand: 10,
    }
}

fn problem(
    vehicles: Vec<VehicleResource>,
    tasks: Vec<TaskNode>,
    options: SolveOptions,
) -> RoutingProblem {
    let nodes = NodeIndex::for_inputs(&vehicles, &tasks);
    let matrices = LinearMatrixProvider::default()
        .travel_matrices(nodes.ids())
        .unwrap();
    RoutingProblem {
        key: PlanKey::new(1, 1),
        vehicles,
        tasks,
        nodes,
        matrices,
        options,
    }
}

#[test]
fn assigns_every_feasible_task_without_dropping() {
    let options = SolveOptions {
        allow_drop: false,
        ..SolveOptions::default()
    };
    let p = problem(
        vec![vehicle(1), vehicle(2)],
        vec![task(1, 2), task(2, 3), task(3, 4)],
        options,
    );
    let result = InsertionOptimizer::new().solve(&p).unwrap();

    assert_eq!(result.status, ResultStatus::Solved);
    assert_eq!(result.kpi.assigned_count, 3);
    assert_eq!(result.kpi.unassigned_count, 0);
    assert!(result.unassigned.is_empty());
    // One entry per vehicle, stops across them cover every task.
    assert_eq!(result.routes.len(), 2);
    let stop_count: usize = result.routes.iter().map(|r| r.stops.len()).sum();
    assert_eq!(stop_count, 3);
}

#[test]
fn drops_exactly_the_unreachable_task_when_allowed() {
    let unreachable = TaskNode {
        tw_start_sec: 10,
        tw_end_sec: 20,
        ..task(2, 3)
    };
    let p = problem(
        vec![vehicle(1), vehicle(2)],
        vec![task(1, 2), unreachable, task(3, 4)],
        SolveOptions::default(),
    );
    let result = InsertionOptimizer::new().solve(&p).unwrap();

    assert_eq!(result.status, ResultStatus::Solved);
    assert_eq!(result.kpi.assigned_count, 2);
    assert_eq!(result.kpi.unassigned_count, 1);
    assert_eq!(result.unassigned.len(), 1);
    assert_eq!(result.unassigned[0].task_id, 2);
    assert_eq!(result.unassigned[0].reason, UnassignedReason::Dropped);
}

#[test]
fn fails_outright_when_dropping_is_disallowed() {
    let unreachable = TaskNode {
        tw_start_sec: 10,
        tw_end_sec: 20,
        ..task(2, 3)
    };
    let p = problem(
        vec![vehicle(1)],
        vec![task(1, 2), unreachable],
        SolveOptions {
            allow_drop: false,
            ..SolveOptions::default()
        },
    );
    let result = InsertionOptimizer::new().solve(&p).unwrap();

    assert_eq!(result.status, ResultStatus::Failed);
    assert_eq!(result.kpi.assigned_count, 0);
    assert_eq!(result.kpi.unassigned_count, 2);
    assert!(result.routes.is_empty());
    assert!(
        result
            .unassigned
            .iter()
            .all(|u| u.reason == UnassignedReason::NoSolution)
    );
}

#[test]
fn capacity_splits_load_across_vehicles() {
    let mut v1 = vehicle(1);
    v1.capacity = 20;
    let mut v2 = vehicle(2);
    v2.capacity = 20;
    let heavy = |id: u64, node: u64| TaskNode {
        demand: 15,
        ..task(id, node)
    };
    let p = problem(
        vec![v1, v2],
        vec![heavy(1, 2), heavy(2, 3)],
        SolveOptions {
            allow_drop: false,
            ..SolveOptions::default()
        },
    );
    let result = InsertionOptimizer::new().solve(&p).unwrap();

    assert_eq!(result.status, ResultStatus::Solved);
    assert_eq!(result.kpi.assigned_count, 2);
    assert!(result.routes.iter().all(|r| r.stops.len() == 1));
}

#[test]
fn stop_times_cover_travel_and_service() {
    let p = problem(vec![vehicle(1)], vec![task(1, 2), task(2, 3)], SolveOptions::default());
    let result = InsertionOptimizer::new().solve(&p).unwrap();

    let route = &result.routes[0];
    assert_eq!(route.stops.len(), 2);
    assert_eq!(route.total_distance_m, 4000);
    for (i, stop) in route.stops.iter().enumerate() {
        assert_eq!(stop.seq, i as u32);
        assert_eq!(stop.etd_sec, stop.eta_sec + stop.service_time_sec);
    }
}

#[rstest]
#[case(Vec::new(), vec![task(1, 2)])]
#[case(vec![vehicle(1)], Vec::new())]
fn empty_inputs_yield_the_no_solution_outcome(
    #[case] vehicles: Vec<VehicleResource>,
    #[case] tasks: Vec<TaskNode>,
) {
    let expected_unassigned = tasks.len();
    let p = problem(vehicles, tasks, SolveOptions::default());
    let result = InsertionOptimizer::new().solve(&p).unwrap();
    assert_eq!(result.status, ResultStatus::Failed);
    assert_eq!(result.kpi.unassigned_count, expected_unassigned);
}

#[test]
fn honors_a_tight_time_budget_without_hanging() {
    let options = SolveOptions {
        time_limit: Duration::from_secs(1),
        ..SolveOptions::default()
    };
    let tasks: Vec<TaskNode> = (0..20).map(|i| task(i + 1, i + 2)).collect();
    let p = problem(vec![vehicle(1), vehicle(2)], tasks, options);
    let result = InsertionOptimizer::new().solve(&p).unwrap();
    assert_eq!(result.status, ResultStatus::Solved);
}

#[test]
fn rejects_malformed_matrices() {
    let vehicles = vec![vehicle(1)];
    let tasks = vec![task(1, 2)];
    let nodes = NodeIndex::for_inputs(&vehicles, &tasks);
    let p = RoutingProblem {
        key: PlanKey::new(1, 1),
        vehicles,
        tasks,
        nodes,
        matrices: TravelMatrices::default(),
        options: SolveOptions::default(),
    };
    assert!(matches!(
        InsertionOptimizer::new().solve(&p),
        Err(OptimizerError::MalformedProblem(_))
    ));
}

#[test]
fn identical_problems_yield_identical_solutions() {
    let p = problem(
        vec![vehicle(1), vehicle(2)],
        vec![task(1, 2), task(2, 3), task(3, 4), task(4, 5)],
        SolveOptions::default(),
    );
    let first = InsertionOptimizer::new().solve(&p).unwrap();
    let second = InsertionOptimizer::new().solve(&p).unwrap();
    assert_eq!(first.routes, second.routes);
    assert_eq!(first.unassigned, second.unassigned);
}
