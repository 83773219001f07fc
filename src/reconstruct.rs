//! Solution Reconstruction (C6).
//!
//! Turns solver values back into [`Assignment`] records with wall-clock
//! timestamps, synthesizes the one break record every worker always gets,
//! and computes remaining [`UnassignedDemand`] per task.

use chrono::NaiveDate;
use selen::prelude::*;

use crate::domain::{Assignment, OptimizeResponse, Task, UnassignedDemand, Worker};
use crate::eligibility::CandidateSet;
use crate::model::CandidateVars;
use crate::time::{reconstruct_interval, ShiftWindow};

pub fn reconstruct(
    date: NaiveDate,
    tasks: &[Task],
    workers: &[Worker],
    shifts: &[ShiftWindow],
    candidates: &CandidateSet,
    vars: &[CandidateVars],
    solution: &Solution,
) -> OptimizeResponse {
    let mut assignments = Vec::new();
    let mut served_per_task = vec![0i64; tasks.len()];

    for (i, c) in candidates.candidates.iter().enumerate() {
        let cv = vars[i];
        let units = solution.get::<i32>(cv.split_units) as i64;
        if units <= 0 {
            continue;
        }
        served_per_task[c.task_idx] += units;

        let shift = &shifts[c.worker_idx];
        let start_minute = solution.get::<i32>(cv.start) as i64;
        let end_minute = solution.get::<i32>(cv.end) as i64;
        let task = &tasks[c.task_idx];
        let worker = &workers[c.worker_idx];
        let (start, end) = reconstruct_interval(date, shift, start_minute, end_minute);

        assignments.push(Assignment {
            worker_id: worker.id.clone(),
            task_id: task.id.clone(),
            task_name: Some(task.name.clone()),
            start,
            end,
            units,
            is_break: false,
            task_type: task.task_type.clone(),
        });
    }

    for (worker_idx, worker) in workers.iter().enumerate() {
        let shift = &shifts[worker_idx];
        let (break_start, break_end) = shift.break_window(worker.break_minutes);
        let (start, end) = reconstruct_interval(date, shift, break_start, break_end);
        assignments.push(Assignment {
            worker_id: worker.id.clone(),
            task_id: "0".to_string(),
            task_name: None,
            start,
            end,
            units: 0,
            is_break: true,
            task_type: None,
        });
    }

    let unassigned_tasks = tasks
        .iter()
        .enumerate()
        .filter_map(|(idx, t)| {
            let remaining = t.units - served_per_task[idx];
            if remaining > 0 {
                Some(UnassignedDemand {
                    task_id: t.id.clone(),
                    remaining_units: remaining,
                })
            } else {
                None
            }
        })
        .collect();

    OptimizeResponse {
        assignments,
        unassigned_tasks,
    }
}
