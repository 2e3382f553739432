//! Per-round tally of the recorded policy.
//!
//! Read-only over a solved [`Solver`]: nothing here triggers further solving.

use std::fmt;

use serde::Serialize;

use crate::state_computation::{SolveStats, Solver};
use crate::types::Action;

/// Decision counts for one round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round: usize,
    /// Distinct (score, active pool) keys with a recorded decision.
    pub entries: usize,
    pub acquire: usize,
    pub promote: usize,
    /// Share of decided keys choosing acquire, `None` when nothing was decided.
    pub percent_acquire: Option<f64>,
    /// Memoized states at this round, forced and free alike.
    pub states: usize,
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round: {:2}, entries: {:7}, acquire: {:7}, promote: {:7}, ",
            self.round, self.entries, self.acquire, self.promote
        )?;
        match self.percent_acquire {
            Some(pct) => write!(f, "percent_acquire: {:6.2}", pct),
            None => write!(f, "percent_acquire: no decisions"),
        }
    }
}

/// Everything the driver prints after a solve.
#[derive(Clone, Debug, Serialize)]
pub struct SolveReport {
    pub rounds: usize,
    pub expected_score: f64,
    pub stats: SolveStats,
    pub per_round: Vec<RoundSummary>,
}

/// Tally acquire and promote decisions for every round of `solver`.
pub fn summarize_rounds(solver: &Solver) -> Vec<RoundSummary> {
    let states = solver.states_per_round();
    (0..solver.horizon() as usize)
        .map(|round| {
            let mut acquire = 0;
            let mut promote = 0;
            for (_, decision) in solver.decisions(round) {
                match decision.action {
                    Action::Acquire => acquire += 1,
                    Action::Promote => promote += 1,
                    Action::Reactivate => {}
                }
            }
            let entries = acquire + promote;
            let percent_acquire = if entries > 0 {
                Some(acquire as f64 * 100.0 / entries as f64)
            } else {
                None
            };
            RoundSummary {
                round,
                entries,
                acquire,
                promote,
                percent_acquire,
                states: states[round],
            }
        })
        .collect()
}

/// Root value plus per-round summaries of an already solved `solver`.
pub fn build_report(solver: &Solver, expected_score: f64) -> SolveReport {
    SolveReport {
        rounds: solver.horizon() as usize,
        expected_score,
        stats: solver.stats(),
        per_round: summarize_rounds(solver),
    }
}
