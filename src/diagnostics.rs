//! Diagnostic Logger (C7).
//!
//! Pure logging functions, called from the other components as each stage
//! completes, matching spec §4.7's three pre-solve lines, per-rejection
//! reasons, and post-solve summary.

use std::time::Duration;

use selen::prelude::*;
use tracing::{info, warn};

use crate::domain::{Task, Worker};
use crate::eligibility::CandidateSet;
use crate::model::CandidateVars;
use crate::time::ShiftWindow;

pub fn log_pre_solve(candidates: &CandidateSet, tasks: &[Task]) {
    for elig in &candidates.task_eligibility {
        let task_id = &tasks[elig.task_idx].id;
        if elig.possible_workers == 0 {
            warn!(task_id, "no worker has required skill");
        } else if elig.qualified_workers == 0 {
            warn!(
                task_id,
                possible = elig.possible_workers,
                min_level = elig.min_level,
                "workers have the skill, 0 meet minimum level"
            );
        } else {
            info!(
                task_id,
                qualified = elig.qualified_workers,
                possible = elig.possible_workers,
                "workers qualify"
            );
        }
    }

    for rejection in &candidates.rejections {
        let task_id = &tasks[rejection.task_idx].id;
        warn!(
            task_id,
            reason = rejection.reason.as_log_str(),
            "rejected candidate"
        );
    }
}

pub fn log_missing_productivity_defaults(candidates: &CandidateSet, tasks: &[Task], workers: &[Worker]) {
    for c in &candidates.candidates {
        if c.productivity_defaulted {
            warn!(
                task_id = %tasks[c.task_idx].id,
                worker_id = %workers[c.worker_idx].id,
                "productivity missing for skill, defaulted to 1"
            );
        }
        if c.degraded {
            info!(
                task_id = %tasks[c.task_idx].id,
                worker_id = %workers[c.worker_idx].id,
                "admitted as degraded candidate"
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn log_post_solve(
    status_label: &str,
    objective_value: Option<i64>,
    wall_time: Duration,
    tasks: &[Task],
    workers: &[Worker],
    shifts: &[ShiftWindow],
    candidates: &CandidateSet,
    vars: &[CandidateVars],
    solution: Option<&Solution>,
) {
    info!(
        status = status_label,
        objective = objective_value,
        wall_time_ms = wall_time.as_millis() as u64,
        "solve complete"
    );

    let Some(solution) = solution else {
        return;
    };

    let mut served_per_task = vec![0i64; tasks.len()];
    let mut worked_minutes_per_worker = vec![0i64; workers.len()];
    let mut quality_total = 0.0;
    let mut quality_count = 0i64;

    for (i, c) in candidates.candidates.iter().enumerate() {
        let cv = vars[i];
        let units = solution.get::<i32>(cv.split_units) as i64;
        if units <= 0 {
            continue;
        }
        served_per_task[c.task_idx] += units;
        let duration = solution.get::<i32>(cv.duration) as i64;
        worked_minutes_per_worker[c.worker_idx] += duration;
        quality_total += c.quality;
        quality_count += 1;
    }

    let (mut fully, mut partially, mut unassigned) = (0, 0, 0);
    for (idx, task) in tasks.iter().enumerate() {
        if task.units == 0 {
            continue;
        }
        let served = served_per_task[idx];
        if served >= task.units {
            fully += 1;
        } else if served > 0 {
            partially += 1;
        } else {
            unassigned += 1;
        }
    }
    info!(fully, partially, unassigned, "per-task outcome counts");

    for (idx, worker) in workers.iter().enumerate() {
        let available = shifts[idx].available_minutes(worker.break_minutes).max(1);
        let utilization = worked_minutes_per_worker[idx] as f64 / available as f64;
        info!(worker_id = %worker.id, utilization, "per-worker utilization");
    }

    let avg_quality = if quality_count > 0 {
        quality_total / quality_count as f64
    } else {
        0.0
    };
    info!(avg_quality, "average quality score across emitted assignments");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task as T;
    use crate::eligibility::{build_candidates, min_skill_level};
    use std::collections::HashSet;

    #[test]
    fn pre_solve_does_not_panic_on_empty_candidates() {
        let tasks = vec![T {
            id: "T1".to_string(),
            name: "T1".to_string(),
            skill_id: 999,
            priority: 5,
            units: 10,
            dependencies: Vec::new(),
            task_type: None,
        }];
        let workers: Vec<Worker> = vec![Worker {
            id: "W1".to_string(),
            name: "W1".to_string(),
            skills: HashSet::new(),
            productivity: Default::default(),
            skill_levels: Default::default(),
            shift_start: "08:00".to_string(),
            shift_end: "16:00".to_string(),
            break_minutes: 60,
        }];
        let shift = ShiftWindow::normalize("08:00", "16:00").unwrap();
        let candidates = build_candidates(&tasks, &workers, &[shift]);
        assert_eq!(candidates.task_eligibility[0].possible_workers, 0);
        log_pre_solve(&candidates, &tasks);
        assert_eq!(min_skill_level(5), 1);
    }
}
