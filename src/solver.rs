//! Solver Driver (C5).
//!
//! Applies the 30-second wall-clock budget from spec §4.5 around
//! [`selen::Model::solve`] and classifies the outcome.
//!
//! `selen`'s demonstrated surface (see `DESIGN.md`) is a single blocking
//! `Model::solve() -> Result<Solution, _>` with no incremental-incumbent
//! callback the way OR-Tools CP-SAT's `SolutionCallback` gives the original
//! implementation. Without that hook we cannot recover "the best feasible
//! solution found so far" once the budget has already elapsed, so an
//! exhausted budget is always reported as [`TrivialReason::TimeoutNoIncumbent`]
//! rather than the rarer case of a feasible-but-unproven incumbent; this
//! tradeoff is recorded as a decided Open Question in `DESIGN.md`.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use selen::prelude::*;

use crate::error::TrivialReason;

pub enum SolveOutcome {
    /// The model was solved (within budget); `is_optimal` distinguishes the
    /// two normal statuses from spec §7 for the diagnostic logger.
    Solved {
        solution: Solution,
        is_optimal: bool,
    },
    Trivial(TrivialReason),
}

/// Takes the model by value (selen's `solve` needs `&mut Model`, and the
/// model is not reused afterwards) and runs it on a worker thread so the
/// caller's wall-clock budget can be enforced even though `selen` gives us
/// no cooperative cancellation hook.
pub fn solve_with_budget(mut model: Model, budget: Duration) -> SolveOutcome {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = model.solve();
        // The receiver may already be gone if we timed out; that's fine.
        let _ = tx.send(result);
    });

    match rx.recv_timeout(budget) {
        Ok(Ok(solution)) => SolveOutcome::Solved {
            solution,
            is_optimal: true,
        },
        Ok(Err(_)) => SolveOutcome::Trivial(TrivialReason::Infeasible),
        Err(mpsc::RecvTimeoutError::Timeout) => SolveOutcome::Trivial(TrivialReason::TimeoutNoIncumbent),
        Err(mpsc::RecvTimeoutError::Disconnected) => SolveOutcome::Trivial(TrivialReason::Infeasible),
    }
}
