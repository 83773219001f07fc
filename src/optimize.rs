//! Top-level orchestration wiring C0–C7 together behind one entry point.

use std::time::{Duration, Instant};

use selen::prelude::*;

use crate::diagnostics;
use crate::domain::{OptimizationRequest, OptimizeResponse};
use crate::eligibility::build_candidates;
use crate::error::{SchedulerError, TrivialReason};
use crate::model::build_model;
use crate::solver::{solve_with_budget, SolveOutcome};
use crate::time::ShiftWindow;

/// Runs the full pipeline for one request: shift normalization, candidate
/// eligibility, model construction, solving within `budget`, and solution
/// reconstruction.
pub fn optimize(request: OptimizationRequest, budget: Duration) -> Result<OptimizeResponse, SchedulerError> {
    let OptimizationRequest { date, tasks, workers } = request;

    let shifts: Vec<ShiftWindow> = workers
        .iter()
        .map(|w| ShiftWindow::normalize(&w.shift_start, &w.shift_end))
        .collect::<Result<_, _>>()?;
    let break_minutes: Vec<i64> = workers.iter().map(|w| w.break_minutes).collect();

    let candidates = build_candidates(&tasks, &workers, &shifts);
    diagnostics::log_pre_solve(&candidates, &tasks);
    diagnostics::log_missing_productivity_defaults(&candidates, &tasks, &workers);

    if candidates.candidates.is_empty() {
        diagnostics::log_post_solve(
            TrivialReason::NoCandidates.as_log_str(),
            None,
            Duration::ZERO,
            &tasks,
            &workers,
            &shifts,
            &candidates,
            &[],
            None,
        );
        return Ok(OptimizeResponse::all_unassigned(&tasks));
    }

    let built = build_model(&tasks, &shifts, &break_minutes, &candidates);
    let vars = built.vars;
    let objective = built.objective;

    let start = Instant::now();
    let outcome = solve_with_budget(built.model, budget);
    let wall_time = start.elapsed();

    match outcome {
        SolveOutcome::Solved { solution, is_optimal } => {
            let objective_value = solution.get::<i32>(objective) as i64;
            let response = crate::reconstruct::reconstruct(
                date, &tasks, &workers, &shifts, &candidates, &vars, &solution,
            );
            let status = if is_optimal { "optimal" } else { "feasible" };
            diagnostics::log_post_solve(
                status,
                Some(objective_value),
                wall_time,
                &tasks,
                &workers,
                &shifts,
                &candidates,
                &vars,
                Some(&solution),
            );
            Ok(response)
        }
        SolveOutcome::Trivial(reason) => {
            diagnostics::log_post_solve(
                reason.as_log_str(),
                None,
                wall_time,
                &tasks,
                &workers,
                &shifts,
                &candidates,
                &vars,
                None,
            );
            Ok(OptimizeResponse::all_unassigned(&tasks))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, Worker};
    use std::collections::HashSet;
    use std::time::Duration;

    fn date() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2025, 8, 5).unwrap()
    }

    #[test]
    fn single_task_single_worker_gets_served() {
        let tasks = vec![Task {
            id: "T1".to_string(),
            name: "Pick".to_string(),
            skill_id: 100,
            priority: 5,
            units: 50,
            dependencies: Vec::new(),
            task_type: None,
        }];
        let workers = vec![Worker {
            id: "W1".to_string(),
            name: "Alice".to_string(),
            skills: HashSet::from([100]),
            productivity: [(100, 80)].into_iter().collect(),
            skill_levels: Default::default(),
            shift_start: "08:00".to_string(),
            shift_end: "16:00".to_string(),
            break_minutes: 60,
        }];
        let request = OptimizationRequest::new(date(), tasks, workers).unwrap();
        let response = optimize(request, Duration::from_secs(5)).unwrap();
        let served: i64 = response
            .assignments
            .iter()
            .filter(|a| !a.is_break)
            .map(|a| a.units)
            .sum();
        assert_eq!(served, 50);
        assert!(response.unassigned_tasks.is_empty());
        assert_eq!(response.assignments.iter().filter(|a| a.is_break).count(), 1);
    }

    #[test]
    fn no_candidates_yields_trivial_all_unassigned() {
        let tasks = vec![Task {
            id: "T1".to_string(),
            name: "Pick".to_string(),
            skill_id: 999,
            priority: 5,
            units: 50,
            dependencies: Vec::new(),
            task_type: None,
        }];
        let workers = vec![Worker {
            id: "W1".to_string(),
            name: "Alice".to_string(),
            skills: HashSet::from([100]),
            productivity: [(100, 80)].into_iter().collect(),
            skill_levels: Default::default(),
            shift_start: "08:00".to_string(),
            shift_end: "16:00".to_string(),
            break_minutes: 60,
        }];
        let request = OptimizationRequest::new(date(), tasks, workers).unwrap();
        let response = optimize(request, Duration::from_secs(5)).unwrap();
        assert!(response.assignments.is_empty());
        assert_eq!(response.unassigned_tasks.len(), 1);
        assert_eq!(response.unassigned_tasks[0].remaining_units, 50);
    }
}
