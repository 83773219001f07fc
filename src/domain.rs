//! Domain model for the workforce scheduling problem (spec §3).
//!
//! These types are the validated, already-normalized shape the rest of the
//! crate works with; the wire format (with its optional fields and
//! string-keyed productivity maps) lives in [`crate::dto`] and converts into
//! these via [`OptimizationRequest::new`].

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::SchedulerError;

#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub skill_id: i64,
    pub priority: i64,
    pub units: i64,
    pub dependencies: Vec<String>,
    pub task_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub skills: HashSet<i64>,
    pub productivity: HashMap<i64, i64>,
    pub skill_levels: HashMap<i64, i64>,
    pub shift_start: String,
    pub shift_end: String,
    pub break_minutes: i64,
}

impl Worker {
    /// Productivity for a skill, defaulting to 1 (with the caller expected
    /// to log a warning) when unspecified.
    pub fn productivity_for(&self, skill_id: i64) -> (i64, bool) {
        match self.productivity.get(&skill_id) {
            Some(&p) => (p, false),
            None => (1, true),
        }
    }

    /// Skill level for a skill, defaulting to 1 when unspecified.
    pub fn skill_level_for(&self, skill_id: i64) -> i64 {
        self.skill_levels.get(&skill_id).copied().unwrap_or(1)
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationRequest {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub workers: Vec<Worker>,
}

impl OptimizationRequest {
    /// Builds a request, applying the BadInput checks from spec §7: empty
    /// tasks/workers, negative units, unknown dependency ids, and cyclic
    /// dependencies. Malformed `HH:MM` is checked separately by
    /// [`crate::time::ShiftWindow::normalize`] when the model is built,
    /// since it is needed per-worker there regardless.
    pub fn new(
        date: NaiveDate,
        tasks: Vec<Task>,
        workers: Vec<Worker>,
    ) -> Result<Self, SchedulerError> {
        if tasks.is_empty() {
            return Err(SchedulerError::BadInput("no tasks provided".to_string()));
        }
        if workers.is_empty() {
            return Err(SchedulerError::BadInput("no workers provided".to_string()));
        }

        let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        if ids.len() != tasks.len() {
            return Err(SchedulerError::BadInput("duplicate task id".to_string()));
        }

        for t in &tasks {
            if t.units < 0 {
                return Err(SchedulerError::BadInput(format!(
                    "task {} has negative units",
                    t.id
                )));
            }
            for dep in &t.dependencies {
                if !ids.contains(dep.as_str()) {
                    return Err(SchedulerError::BadInput(format!(
                        "task {} depends on unknown task {}",
                        t.id, dep
                    )));
                }
            }
        }

        let worker_ids: HashSet<&str> = workers.iter().map(|w| w.id.as_str()).collect();
        if worker_ids.len() != workers.len() {
            return Err(SchedulerError::BadInput("duplicate worker id".to_string()));
        }

        detect_dependency_cycle(&tasks)?;

        Ok(Self {
            date,
            tasks,
            workers,
        })
    }
}

/// Depth-first cycle detection over the task dependency graph (`dep -> t`
/// edges). Any cycle is a caller error per spec §4.3: "the scheduler must
/// not silently drop them".
fn detect_dependency_cycle(tasks: &[Task]) -> Result<(), SchedulerError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let index_of: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    let mut marks = vec![Mark::Unvisited; tasks.len()];

    fn visit(
        idx: usize,
        tasks: &[Task],
        index_of: &HashMap<&str, usize>,
        marks: &mut Vec<Mark>,
    ) -> Result<(), SchedulerError> {
        match marks[idx] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(SchedulerError::BadInput(format!(
                    "cyclic dependency involving task {}",
                    tasks[idx].id
                )))
            }
            Mark::Unvisited => {}
        }
        marks[idx] = Mark::InProgress;
        for dep in &tasks[idx].dependencies {
            let dep_idx = index_of[dep.as_str()];
            visit(dep_idx, tasks, index_of, marks)?;
        }
        marks[idx] = Mark::Done;
        Ok(())
    }

    for i in 0..tasks.len() {
        visit(i, tasks, &index_of, &mut marks)?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub worker_id: String,
    pub task_id: String,
    pub task_name: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub units: i64,
    pub is_break: bool,
    pub task_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignedDemand {
    pub task_id: String,
    pub remaining_units: i64,
}

#[derive(Debug, Clone, Default)]
pub struct OptimizeResponse {
    pub assignments: Vec<Assignment>,
    pub unassigned_tasks: Vec<UnassignedDemand>,
}

impl OptimizeResponse {
    /// Every task fully unassigned: the shape used for ModelTrivial,
    /// SolverInfeasible, and SolverTimeoutNoIncumbent alike (spec §7).
    pub fn all_unassigned(tasks: &[Task]) -> Self {
        Self {
            assignments: Vec::new(),
            unassigned_tasks: tasks
                .iter()
                .filter(|t| t.units > 0)
                .map(|t| UnassignedDemand {
                    task_id: t.id.clone(),
                    remaining_units: t.units,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, deps: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            name: id.to_string(),
            skill_id: 100,
            priority: 5,
            units: 10,
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
            task_type: None,
        }
    }

    fn worker(id: &str) -> Worker {
        Worker {
            id: id.to_string(),
            name: id.to_string(),
            skills: HashSet::from([100]),
            productivity: HashMap::from([(100, 60)]),
            skill_levels: HashMap::new(),
            shift_start: "08:00".to_string(),
            shift_end: "16:00".to_string(),
            break_minutes: 60,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap()
    }

    #[test]
    fn rejects_empty_tasks() {
        let err = OptimizationRequest::new(date(), vec![], vec![worker("W1")]).unwrap_err();
        assert!(matches!(err, SchedulerError::BadInput(_)));
    }

    #[test]
    fn rejects_empty_workers() {
        let err = OptimizationRequest::new(date(), vec![task("T1", &[])], vec![]).unwrap_err();
        assert!(matches!(err, SchedulerError::BadInput(_)));
    }

    #[test]
    fn rejects_unknown_dependency() {
        let err = OptimizationRequest::new(date(), vec![task("T1", &["ghost"])], vec![worker("W1")])
            .unwrap_err();
        assert!(err.to_string().contains("unknown task"));
    }

    #[test]
    fn rejects_dependency_cycle() {
        let tasks = vec![task("A", &["B"]), task("B", &["A"])];
        let err = OptimizationRequest::new(date(), tasks, vec![worker("W1")]).unwrap_err();
        assert!(err.to_string().contains("cyclic"));
    }

    #[test]
    fn accepts_well_formed_chain() {
        let tasks = vec![task("A", &[]), task("B", &["A"]), task("C", &["B"])];
        assert!(OptimizationRequest::new(date(), tasks, vec![worker("W1")]).is_ok());
    }

    #[test]
    fn zero_units_task_has_no_unassigned_entry() {
        let mut t = task("A", &[]);
        t.units = 0;
        let resp = OptimizeResponse::all_unassigned(&[t]);
        assert!(resp.unassigned_tasks.is_empty());
    }
}
