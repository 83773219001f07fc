//! Eligibility & Quality Scoring (C2).
//!
//! Decides, for every `(task, worker)` pair, whether it becomes a model
//! candidate, and if so what its integer-scaled quality score and capacity
//! (`max_units`) are. Rejections are reported through [`RejectionReason`] so
//! the diagnostic logger (C7) can say exactly why a pair didn't make it in.

use crate::domain::{Task, Worker};
use crate::time::ShiftWindow;

/// Minimum skill level required to serve a task, from its priority (spec §4.2).
pub fn min_skill_level(priority: i64) -> i64 {
    if priority >= 9 {
        3
    } else if priority >= 7 {
        2
    } else {
        1
    }
}

/// `quality = 0.6 * (skill_level/4) + 0.4 * (productivity/100)`, clipped positive.
fn base_quality(skill_level: i64, productivity: i64) -> f64 {
    let q = 0.6 * (skill_level as f64 / 4.0) + 0.4 * (productivity as f64 / 100.0);
    q.max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    InsufficientSkillLevel,
    InsufficientAvailableMinutes,
}

impl RejectionReason {
    pub fn as_log_str(&self) -> &'static str {
        match self {
            RejectionReason::InsufficientSkillLevel => "insufficient skill level",
            RejectionReason::InsufficientAvailableMinutes => "insufficient available minutes",
        }
    }
}

/// A surviving `(task, worker)` candidate, by index into the request's
/// `tasks`/`workers` vectors (spec §9's sparse bipartite table).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub task_idx: usize,
    pub worker_idx: usize,
    pub max_units: i64,
    pub productivity: i64,
    pub quality: f64,
    pub degraded: bool,
    pub productivity_defaulted: bool,
}

/// Per-task summary used by the diagnostic logger's three pre-solve lines.
#[derive(Debug, Clone)]
pub struct TaskEligibility {
    pub task_idx: usize,
    pub min_level: i64,
    pub possible_workers: usize,
    pub qualified_workers: usize,
}

/// A rejected `(task, worker)` pair, retained only for diagnostics.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub task_idx: usize,
    pub worker_idx: usize,
    pub reason: RejectionReason,
}

pub struct CandidateSet {
    pub candidates: Vec<Candidate>,
    pub by_task: Vec<Vec<usize>>,
    pub by_worker: Vec<Vec<usize>>,
    pub task_eligibility: Vec<TaskEligibility>,
    pub rejections: Vec<Rejection>,
}

/// Builds the full candidate table for a request. `shifts[i]` must be the
/// normalized [`ShiftWindow`] for `workers[i]`.
pub fn build_candidates(tasks: &[Task], workers: &[Worker], shifts: &[ShiftWindow]) -> CandidateSet {
    let mut candidates = Vec::new();
    let mut by_task = vec![Vec::new(); tasks.len()];
    let mut by_worker = vec![Vec::new(); workers.len()];
    let mut task_eligibility = Vec::with_capacity(tasks.len());
    let mut rejections = Vec::new();

    for (task_idx, task) in tasks.iter().enumerate() {
        let min_level = min_skill_level(task.priority);
        let possible: Vec<usize> = workers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.skills.contains(&task.skill_id))
            .map(|(i, _)| i)
            .collect();

        let qualified_count = possible
            .iter()
            .filter(|&&wi| workers[wi].skill_level_for(task.skill_id) >= min_level)
            .count();

        task_eligibility.push(TaskEligibility {
            task_idx,
            min_level,
            possible_workers: possible.len(),
            qualified_workers: qualified_count,
        });

        for worker_idx in possible {
            let worker = &workers[worker_idx];
            let level = worker.skill_level_for(task.skill_id);
            let degraded = level < min_level;

            if degraded && !(task.priority >= 8 && min_level > 1) {
                rejections.push(Rejection {
                    task_idx,
                    worker_idx,
                    reason: RejectionReason::InsufficientSkillLevel,
                });
                continue;
            }

            let (productivity, productivity_defaulted) = worker.productivity_for(task.skill_id);
            let available = shifts[worker_idx].available_minutes(worker.break_minutes);
            let raw_max_units = if available <= 0 { 0 } else { (available * productivity) / 60 };
            if raw_max_units <= 0 {
                rejections.push(Rejection {
                    task_idx,
                    worker_idx,
                    reason: RejectionReason::InsufficientAvailableMinutes,
                });
                continue;
            }
            // Only now cap to the task's own demand: a zero-units task caps
            // every otherwise-available worker's max_units to 0, but that is
            // not a capacity shortfall worth logging as a rejection.
            let max_units = raw_max_units.min(task.units);
            if max_units <= 0 {
                continue;
            }

            let mut quality = base_quality(level, productivity);
            if degraded {
                let penalty = 0.2 * (min_level - level) as f64;
                quality = (quality - penalty).max(0.1);
            }

            let idx = candidates.len();
            candidates.push(Candidate {
                task_idx,
                worker_idx,
                max_units,
                productivity,
                quality,
                degraded,
                productivity_defaulted,
            });
            by_task[task_idx].push(idx);
            by_worker[worker_idx].push(idx);
        }
    }

    CandidateSet {
        candidates,
        by_task,
        by_worker,
        task_eligibility,
        rejections,
    }
}
