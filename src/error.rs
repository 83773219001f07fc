//! Error kinds for the workforce scheduler.
//!
//! Mirrors the outcome table in the spec: `BadInput` rejects the request
//! before the solver ever runs; `ModelTrivial`, `SolverInfeasible`, and
//! `SolverTimeoutNoIncumbent` all produce the same well-formed
//! all-unassigned response but are kept distinct so the diagnostic logger
//! can say which one happened; `InternalFault` carries an opaque id for a
//! truly unexpected failure in solving or reconstruction.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("internal fault {0}")]
    InternalFault(String),
}

/// Why the solver produced no assignments at all, despite a well-formed model.
///
/// Distinct from [`SchedulerError`]: these are not rejections, they produce a
/// valid (empty) `OptimizeResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrivialReason {
    /// No (task, worker) candidate pair exists at all.
    NoCandidates,
    /// The solver proved the model infeasible.
    Infeasible,
    /// The solve budget elapsed before any feasible solution was found.
    TimeoutNoIncumbent,
}

impl TrivialReason {
    pub fn as_log_str(&self) -> &'static str {
        match self {
            TrivialReason::NoCandidates => "trivially-infeasible (no candidates)",
            TrivialReason::Infeasible => "infeasible",
            TrivialReason::TimeoutNoIncumbent => "timeout without incumbent",
        }
    }
}
