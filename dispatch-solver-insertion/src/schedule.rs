//! Feasibility and timing of a candidate visit sequence.

use dispatch_core::{RoutingProblem, TaskNode, VehicleResource};

/// Arrival and departure computed for one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StopTiming {
    pub eta_sec: i64,
    pub etd_sec: i64,
}

/// Timing of a whole route, depot to depot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteSchedule {
    pub timings: Vec<StopTiming>,
    pub total_distance_m: i64,
    pub total_time_sec: i64,
}

/// Walk `sequence` for `vehicle` and return its schedule, or `None` when any
/// constraint is violated.
///
/// The clock starts at the shift start and accumulates travel plus service.
/// Arriving before a task's window means waiting, bounded by
/// `wait_slack_sec`; arriving after the window, exceeding capacity, or
/// returning to the end depot past the shift end all make the sequence
/// infeasible.
///
/// Callers must only pass tasks and depots present in the problem's node
/// index; matrix dimensions are validated up front by the optimizer.
pub(crate) fn evaluate(
    vehicle: &VehicleResource,
    sequence: &[&TaskNode],
    problem: &RoutingProblem,
    wait_slack_sec: i64,
) -> Option<RouteSchedule> {
    if vehicle.work_start_sec > vehicle.work_end_sec {
        return None;
    }
    let nodes = &problem.nodes;
    let start = nodes.index_of(vehicle.start_node_id)?;
    let end = nodes.index_of(vehicle.end_node_id)?;
    let distance = &problem.matrices.distance_m;
    let time = &problem.matrices.time_sec;

    let mut load = 0_i64;
    let mut clock = vehicle.work_start_sec;
    let mut prev = start;
    let mut total_distance = 0_i64;
    let mut timings = Vec::with_capacity(sequence.len());

    for task in sequence {
        let index = nodes.index_of(task.node_id)?;
        let arrival = clock + time[prev][index];
        let eta = arrival.max(task.tw_start_sec);
        if eta - arrival > wait_slack_sec {
            return None;
        }
        if eta > task.tw_end_sec {
            return None;
        }
        load += task.demand;
        if load > vehicle.capacity {
            return None;
        }
        let etd = eta + task.service_time_sec;
        total_distance += distance[prev][index];
        timings.push(StopTiming {
            eta_sec: eta,
            etd_sec: etd,
        });
        clock = etd;
        prev = index;
    }

    let return_arrival = clock + time[prev][end];
    if return_arrival > vehicle.work_end_sec {
        return None;
    }
    total_distance += distance[prev][end];

    Some(RouteSchedule {
        timings,
        total_distance_m: total_distance,
        total_time_sec: return_arrival - vehicle.work_start_sec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::{
        LinearMatrixProvider, MatrixProvider, NodeIndex, PlanKey, SolveOptions,
    };

    fn vehicle(capacity: i64, work_start: i64, work_end: i64) -> VehicleResource {
        VehicleResource {
            vehicle_id: 1,
            start_node_id: 1,
            end_node_id: 1,
            capacity,
            work_start_sec: work_start,
            work_end_sec: work_end,
        }
    }

    fn task(id: u64, node: u64, tw_start: i64, tw_end: i64) -> TaskNode {
        TaskNode {
            task_id: id,
            node_id: node,
            tw_start_sec: tw_start,
            tw_end_sec: tw_end,
            service_time_sec: 600,
            demand: 10,
        }
    }

    fn problem(vehicles: Vec<VehicleResource>, tasks: Vec<TaskNode>) -> RoutingProblem {
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
            options: SolveOptions::default(),
        }
    }

    #[test]
    fn accumulates_travel_service_and_return() {
        let v = vehicle(100, 0, 86_400);
        let t1 = task(1, 2, 0, 86_400);
        let t2 = task(2, 3, 0, 86_400);
        let p = problem(vec![v], vec![t1, t2]);

        let schedule = evaluate(&v, &[&t1, &t2], &p, 1800).unwrap();
        // depot(0) -> t1(1) -> t2(2) -> depot(0) on the linear matrix
        assert_eq!(schedule.timings[0], StopTiming { eta_sec: 120, etd_sec: 720 });
        assert_eq!(schedule.timings[1], StopTiming { eta_sec: 840, etd_sec: 1440 });
        assert_eq!(schedule.total_distance_m, 1000 + 1000 + 2000);
        assert_eq!(schedule.total_time_sec, 1440 + 240);
    }

    #[test]
    fn waits_for_a_late_window_within_slack() {
        let v = vehicle(100, 0, 86_400);
        let t = task(1, 2, 1900, 86_400);
        let p = problem(vec![v], vec![t]);
        let schedule = evaluate(&v, &[&t], &p, 1800).unwrap();
        assert_eq!(schedule.timings[0].eta_sec, 1900);
    }

    #[test]
    fn rejects_waits_beyond_the_slack() {
        let v = vehicle(100, 0, 86_400);
        let t = task(1, 2, 2000, 86_400);
        let p = problem(vec![v], vec![t]);
        assert!(evaluate(&v, &[&t], &p, 1800).is_none());
    }

    #[test]
    fn rejects_arrivals_after_the_window() {
        let v = vehicle(100, 0, 86_400);
        let t = task(1, 2, 0, 100);
        let p = problem(vec![v], vec![t]);
        assert!(evaluate(&v, &[&t], &p, 1800).is_none());
    }

    #[test]
    fn rejects_loads_over_capacity() {
        let v = vehicle(15, 0, 86_400);
        let t1 = task(1, 2, 0, 86_400);
        let t2 = task(2, 3, 0, 86_400);
        let p = problem(vec![v], vec![t1, t2]);
        assert!(evaluate(&v, &[&t1], &p, 1800).is_some());
        assert!(evaluate(&v, &[&t1, &t2], &p, 1800).is_none());
    }

    #[test]
    fn rejects_returns_after_shift_end() {
        let v = vehicle(100, 0, 800);
        let t = task(1, 2, 0, 86_400);
        let p = problem(vec![v], vec![t]);
        // 120 travel + 600 service + 120 return = 840 > 800
        assert!(evaluate(&v, &[&t], &p, 1800).is_none());
    }

    #[test]
    fn empty_sequences_cost_only_the_depot_leg() {
        let v = vehicle(100, 0, 86_400);
        let p = problem(vec![v], vec![task(1, 2, 0, 86_400)]);
        let schedule = evaluate(&v, &[], &p, 1800).unwrap();
        assert_eq!(schedule.total_distance_m, 0);
        assert_eq!(schedule.total_time_sec, 0);
    }
}
