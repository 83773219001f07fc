//! Wire DTOs & Validation (C0).
//!
//! Mirrors the JSON shapes from spec §6 exactly (snake_case, optional
//! fields defaulted). Converts into the internal [`crate::domain`] types,
//! surfacing malformed input as [`SchedulerError::BadInput`].

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{self, Assignment, OptimizationRequest, OptimizeResponse, UnassignedDemand};
use crate::error::SchedulerError;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequestDto {
    pub date: String,
    pub tasks: Vec<TaskDto>,
    pub workers: Vec<WorkerDto>,
}

#[derive(Debug, Deserialize)]
pub struct TaskDto {
    pub id: String,
    pub name: String,
    pub skill_id: i64,
    pub priority: i64,
    pub units: i64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(rename = "type", default)]
    pub task_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkerDto {
    pub id: String,
    pub name: String,
    pub skills: Vec<i64>,
    pub productivity: HashMap<String, i64>,
    #[serde(default)]
    pub skill_levels: HashMap<String, i64>,
    pub shift_start: String,
    pub shift_end: String,
    pub break_minutes: i64,
}

/// Parses a JSON object's string keys (skill ids are always transmitted as
/// object keys, hence strings) back into the `i64` skill ids used
/// internally.
fn parse_skill_keyed_map(raw: &HashMap<String, i64>, field: &str) -> Result<HashMap<i64, i64>, SchedulerError> {
    raw.iter()
        .map(|(k, &v)| {
            k.parse::<i64>()
                .map(|skill_id| (skill_id, v))
                .map_err(|_| SchedulerError::BadInput(format!("{field} has non-numeric skill id {k:?}")))
        })
        .collect()
}

impl TaskDto {
    fn into_domain(self) -> domain::Task {
        domain::Task {
            id: self.id,
            name: self.name,
            skill_id: self.skill_id,
            priority: self.priority,
            units: self.units,
            dependencies: self.dependencies,
            task_type: self.task_type,
        }
    }
}

impl WorkerDto {
    fn into_domain(self) -> Result<domain::Worker, SchedulerError> {
        Ok(domain::Worker {
            id: self.id,
            name: self.name,
            skills: self.skills.into_iter().collect(),
            productivity: parse_skill_keyed_map(&self.productivity, "productivity")?,
            skill_levels: parse_skill_keyed_map(&self.skill_levels, "skill_levels")?,
            shift_start: self.shift_start,
            shift_end: self.shift_end,
            break_minutes: self.break_minutes,
        })
    }
}

impl OptimizeRequestDto {
    pub fn into_domain(self) -> Result<OptimizationRequest, SchedulerError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| SchedulerError::BadInput(format!("invalid date: {:?}", self.date)))?;

        let tasks = self.tasks.into_iter().map(TaskDto::into_domain).collect();
        let workers = self
            .workers
            .into_iter()
            .map(WorkerDto::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        OptimizationRequest::new(date, tasks, workers)
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentDto {
    pub worker_id: String,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    pub start: String,
    pub end: String,
    pub units: i64,
    pub is_break: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnassignedTaskDto {
    pub id: String,
    pub remaining_units: i64,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponseDto {
    pub assignments: Vec<AssignmentDto>,
    pub unassigned_tasks: Vec<UnassignedTaskDto>,
}

fn format_naive_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

impl From<Assignment> for AssignmentDto {
    fn from(a: Assignment) -> Self {
        Self {
            worker_id: a.worker_id,
            task_id: a.task_id,
            task_name: a.task_name,
            start: format_naive_datetime(a.start),
            end: format_naive_datetime(a.end),
            units: a.units,
            is_break: a.is_break,
            task_type: a.task_type,
        }
    }
}

impl From<UnassignedDemand> for UnassignedTaskDto {
    fn from(u: UnassignedDemand) -> Self {
        Self {
            id: u.task_id,
            remaining_units: u.remaining_units,
        }
    }
}

impl From<OptimizeResponse> for OptimizeResponseDto {
    fn from(r: OptimizeResponse) -> Self {
        Self {
            assignments: r.assignments.into_iter().map(Into::into).collect(),
            unassigned_tasks: r.unassigned_tasks.into_iter().map(Into::into).collect(),
        }
    }
}
