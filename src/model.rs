//! Constraint Model Builder (C3) and Objective Builder (C4).
//!
//! Builds a [`selen`] model over the candidate table from [`crate::eligibility`].
//! `selen` does not expose OR-Tools-style named globals for optional
//! intervals, no-overlap, or max-equality; every one of those primitives is
//! linearized by hand from `selen`'s linear-arithmetic-and-boolean core, per
//! the modeling note in `SPEC_FULL.md` §4 and the ledger in `DESIGN.md`.
//!
//! All minute-valued and unit-valued quantities fit comfortably in `i32`
//! (a shift never spans more than a few thousand minutes), matching
//! `selen`'s own `Model::int(i32, i32)` domain signature; the domain layer
//! keeps `i64` for headroom and casts down at this boundary.

use selen::prelude::*;

use crate::domain::Task;
use crate::eligibility::CandidateSet;
use crate::time::ShiftWindow;

/// Decision variables for one surviving `(task, worker)` candidate.
#[derive(Debug, Clone, Copy)]
pub struct CandidateVars {
    pub presence: VarId,
    pub split_units: VarId,
    pub start: VarId,
    pub end: VarId,
    pub duration: VarId,
}

pub struct BuiltModel {
    pub model: Model,
    pub vars: Vec<CandidateVars>,
    pub objective: VarId,
}

/// A safe big-M for a worker: any minute-valued quantity in that worker's
/// model is bounded by its own normalized shift length.
fn big_m_for(shift: &ShiftWindow) -> i32 {
    shift.length().max(1) as i32
}

/// `round(500 * quality)`, the integer-scaled quality coefficient from
/// spec §4.4.
fn quality_coefficient(quality: f64) -> i32 {
    (500.0 * quality).round() as i32
}

pub fn build_model(
    tasks: &[Task],
    shifts: &[ShiftWindow],
    break_minutes: &[i64],
    candidates: &CandidateSet,
) -> BuiltModel {
    let mut m = Model::default();

    // --- per-candidate decision variables -------------------------------
    let vars: Vec<CandidateVars> = candidates
        .candidates
        .iter()
        .map(|c| {
            let shift = &shifts[c.worker_idx];
            let presence = m.int(0, 1);
            let split_units = m.int(0, c.max_units as i32);
            let start = m.int(shift.start as i32, shift.end as i32);
            let end = m.int(shift.start as i32, shift.end as i32);
            let duration = m.int(0, shift.length() as i32);
            CandidateVars {
                presence,
                split_units,
                start,
                end,
                duration,
            }
        })
        .collect();

    for (i, c) in candidates.candidates.iter().enumerate() {
        let cv = vars[i];
        let shift = &shifts[c.worker_idx];
        let m_big = big_m_for(shift);
        let max_units = c.max_units as i32;
        let productivity = c.productivity as i32;

        // Linkage: presence gates split_units in both directions.
        m.c(cv.split_units).le(max_units * cv.presence);
        m.c(cv.split_units).ge(cv.presence);

        // Ceiling division: duration = ceil(60 * split_units / productivity).
        m.c(60 * cv.split_units).le(productivity * cv.duration);
        m.c(productivity * cv.duration).le(60 * cv.split_units + (productivity - 1));

        // end = start + duration; when split_units is 0, duration is forced
        // to 0 by the inequalities above, so an absent candidate collapses
        // to a zero-length interval rather than needing its own presence gate.
        m.c(cv.end).eq(cv.start + cv.duration);

        // Break disjunction: the interval sits fully before or fully after
        // the fixed break window, unless absent.
        let (break_start, break_end) = shift.break_window(break_minutes[c.worker_idx]);
        let (break_start, break_end) = (break_start as i32, break_end as i32);
        let before_break = m.int(0, 1);
        m.c(cv.end).le(break_start + m_big * (1 - before_break) + m_big * (1 - cv.presence));
        m.c(cv.start).ge(break_end - m_big * before_break - m_big * (1 - cv.presence));
    }

    // --- per-task capacity ----------------------------------------------
    for (task_idx, task) in tasks.iter().enumerate() {
        let task_split_units: Vec<VarId> = candidates.by_task[task_idx]
            .iter()
            .map(|&ci| vars[ci].split_units)
            .collect();
        if task_split_units.is_empty() {
            continue;
        }
        let served = m.sum(&task_split_units);
        m.c(served).le(int(task.units as i32));
    }

    // --- per-worker no-overlap -------------------------------------------
    for worker_candidates in &candidates.by_worker {
        for (a, &ci) in worker_candidates.iter().enumerate() {
            for &cj in &worker_candidates[a + 1..] {
                let worker_idx = candidates.candidates[ci].worker_idx;
                let m_big = big_m_for(&shifts[worker_idx]);
                let (vi, vj) = (vars[ci], vars[cj]);
                let before = m.int(0, 1);
                let slack = m_big * (1 - before) + m_big * (1 - vi.presence) + m_big * (1 - vj.presence);
                m.c(vi.end).le(vj.start + slack);
                let slack_rev = m_big * before + m_big * (1 - vi.presence) + m_big * (1 - vj.presence);
                m.c(vj.end).le(vi.start + slack_rev);
            }
        }
    }

    // --- dependency precedence --------------------------------------------
    for (task_idx, task) in tasks.iter().enumerate() {
        for dep_id in &task.dependencies {
            let dep_idx = tasks
                .iter()
                .position(|t| &t.id == dep_id)
                .expect("dependency ids are validated before model building");
            for &ci in &candidates.by_task[task_idx] {
                for &cj in &candidates.by_task[dep_idx] {
                    let worker_i = candidates.candidates[ci].worker_idx;
                    let worker_j = candidates.candidates[cj].worker_idx;
                    // vi.start and vj.end live in two workers' own normalized
                    // minute windows, which need not share an origin (e.g. a
                    // day shift vs. an overnight one); the worst case the
                    // slack must absorb is the dependency's latest possible
                    // end against the dependent's earliest possible start,
                    // not either shift's own length.
                    let m_big = (shifts[worker_j].end - shifts[worker_i].start).max(1) as i32;
                    let (vi, vj) = (vars[ci], vars[cj]);
                    let slack = m_big * (2 - vi.presence - vj.presence);
                    m.c(vi.start).ge(vj.end - slack);
                }
            }
        }
    }

    // --- objective ---------------------------------------------------------
    let priority_coefficients: Vec<i32> = candidates
        .candidates
        .iter()
        .map(|c| 1000 * tasks[c.task_idx].priority as i32)
        .collect();
    let quality_coefficients: Vec<i32> = candidates
        .candidates
        .iter()
        .map(|c| quality_coefficient(c.quality))
        .collect();

    let priority_terms: Vec<VarId> = candidates
        .candidates
        .iter()
        .zip(vars.iter())
        .zip(priority_coefficients.iter())
        .map(|((c, cv), &coeff)| weighted_term(&mut m, coeff, cv.split_units, c.max_units as i32))
        .collect();
    let quality_terms: Vec<VarId> = candidates
        .candidates
        .iter()
        .zip(vars.iter())
        .zip(quality_coefficients.iter())
        .map(|((c, cv), &coeff)| weighted_term(&mut m, coeff, cv.split_units, c.max_units as i32))
        .collect();

    let priority_total = sum_or_zero(&mut m, &priority_terms);
    let quality_total = sum_or_zero(&mut m, &quality_terms);
    let excess_total = load_balancing_penalty(&mut m, &candidates.by_worker, &vars);

    // Each term variable's own declared max (see `weighted_term`) is
    // `coefficient.max(0) * max_units`; the objective must be able to hold
    // the sum of every term at its max, not a flat per-unit guess.
    let priority_upper: i64 = candidates
        .candidates
        .iter()
        .zip(priority_coefficients.iter())
        .map(|(c, &coeff)| coeff.max(0) as i64 * c.max_units)
        .sum();
    let quality_upper: i64 = candidates
        .candidates
        .iter()
        .zip(quality_coefficients.iter())
        .map(|(c, &coeff)| coeff.max(0) as i64 * c.max_units)
        .sum();
    let upper_bound = (priority_upper + quality_upper).min(i32::MAX as i64) as i32;
    let objective = m.int(0, upper_bound);
    m.c(objective).eq(priority_total + quality_total - 2 * excess_total);
    m.maximize(objective);

    BuiltModel {
        model: m,
        vars,
        objective,
    }
}

/// Auxiliary `term = coefficient * split_units`, kept as its own variable so
/// it can be folded into a plain `Model::sum` alongside the other terms.
fn weighted_term(m: &mut Model, coefficient: i32, split_units: VarId, max_units: i32) -> VarId {
    let term = m.int(0, coefficient.max(0) * max_units);
    m.c(term).eq(coefficient * split_units);
    term
}

fn sum_or_zero(m: &mut Model, terms: &[VarId]) -> VarId {
    if terms.is_empty() {
        m.int(0, 0)
    } else {
        m.sum(terms)
    }
}

/// `excess_w = max(0, load_w - 500)` per worker, linearized as two one-sided
/// inequalities rather than an equality — see `SPEC_FULL.md` §4.
fn load_balancing_penalty(m: &mut Model, by_worker: &[Vec<usize>], vars: &[CandidateVars]) -> VarId {
    let mut excess_terms = Vec::with_capacity(by_worker.len());
    for candidate_idxs in by_worker {
        if candidate_idxs.is_empty() {
            continue;
        }
        let split_units: Vec<VarId> = candidate_idxs.iter().map(|&ci| vars[ci].split_units).collect();
        let load = m.sum(&split_units);
        let excess = m.int(0, i32::MAX / 4);
        m.c(excess).ge(int(0));
        m.c(excess).ge(load - int(500));
        excess_terms.push(excess);
    }
    sum_or_zero(m, &excess_terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Worker;
    use crate::eligibility::build_candidates;
    use std::collections::HashSet;

    fn task(id: &str, skill_id: i64, priority: i64, units: i64, deps: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            name: id.to_string(),
            skill_id,
            priority,
            units,
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
            task_type: None,
        }
    }

    fn worker(id: &str) -> Worker {
        Worker {
            id: id.to_string(),
            name: id.to_string(),
            skills: HashSet::from([100]),
            productivity: [(100, 80)].into_iter().collect(),
            skill_levels: [(100, 4)].into_iter().collect(),
            shift_start: "08:00".to_string(),
            shift_end: "16:00".to_string(),
            break_minutes: 60,
        }
    }

    #[test]
    fn single_task_single_worker_model_builds_and_solves() {
        let tasks = vec![task("T1", 100, 5, 50, &[])];
        let workers = vec![worker("W1")];
        let shift = ShiftWindow::normalize(&workers[0].shift_start, &workers[0].shift_end).unwrap();
        let shifts = vec![shift];
        let break_minutes = vec![workers[0].break_minutes];
        let candidates = build_candidates(&tasks, &workers, &shifts);
        assert_eq!(candidates.candidates.len(), 1);

        let mut built = build_model(&tasks, &shifts, &break_minutes, &candidates);
        let solution = built.model.solve().expect("model should be feasible");
        let served = solution.get::<i32>(built.vars[0].split_units);
        assert!(served > 0 && served as i64 <= tasks[0].units);
        let objective_value = solution.get::<i32>(built.objective);
        assert!(objective_value > 0);
    }

    #[test]
    fn dependent_tasks_respect_precedence_ordering() {
        let tasks = vec![task("A", 100, 5, 10, &[]), task("B", 100, 5, 10, &["A"])];
        let workers = vec![worker("W1")];
        let shift = ShiftWindow::normalize(&workers[0].shift_start, &workers[0].shift_end).unwrap();
        let shifts = vec![shift];
        let break_minutes = vec![workers[0].break_minutes];
        let candidates = build_candidates(&tasks, &workers, &shifts);

        let mut built = build_model(&tasks, &shifts, &break_minutes, &candidates);
        let solution = built.model.solve().expect("model should be feasible");

        let a_vars = candidates.by_task[0]
            .iter()
            .map(|&ci| built.vars[ci])
            .next()
            .unwrap();
        let b_vars = candidates.by_task[1]
            .iter()
            .map(|&ci| built.vars[ci])
            .next()
            .unwrap();
        assert!(solution.get::<i32>(a_vars.end) <= solution.get::<i32>(b_vars.start));
    }
}
