//! Exact forward pass: state visitation probabilities under optimal play.
//!
//! Propagates a single f64 per state (visitation probability) from the
//! initial state through every round, following forced reactivations and the
//! recorded free-choice decisions. No sampling is involved, so the mean of the
//! final score distribution reproduces the root value up to rounding.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::Serialize;

use crate::error::PromoError;
use crate::game_mechanics::{apply_action, reactivate, resolve_outcome};
use crate::state_computation::Solver;
use crate::types::{Action, GameState};

// ── Result types ────────────────────────────────────────────────────────────

/// Aggregates for one round under optimal play.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ForwardRound {
    pub round: usize,
    /// States with positive probability at the start of the round.
    pub reachable_states: usize,
    /// Expected score at the start of the round.
    pub expected_score: f64,
    pub p_reactivate: f64,
    pub p_acquire: f64,
    pub p_promote: f64,
    /// Probability that this round yields nothing and resets the score.
    pub p_bust: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreMass {
    pub score: u16,
    pub mass: f64,
}

/// Complete forward pass result.
#[derive(Clone, Debug, Serialize)]
pub struct ForwardPassResult {
    pub rounds: Vec<ForwardRound>,
    /// Final score distribution, ascending by score.
    pub final_distribution: Vec<ScoreMass>,
    pub expected_final_score: f64,
}

// ── Core algorithm ──────────────────────────────────────────────────────────

/// Run the exact forward pass over an already solved `solver`.
///
/// Fails with [`PromoError::MissingDecision`] if a free-choice state was
/// reached that the solver never evaluated.
pub fn forward_pass(solver: &Solver) -> Result<ForwardPassResult, PromoError> {
    let table = solver.table();
    let mut layer: HashMap<GameState, f64> = HashMap::new();
    layer.insert(GameState::INITIAL, 1.0);

    let mut rounds = Vec::with_capacity(solver.horizon() as usize);
    for round in 0..solver.horizon() as usize {
        let mut summary = ForwardRound {
            round,
            reachable_states: layer.len(),
            ..Default::default()
        };
        let mut next_layer: HashMap<GameState, f64> = HashMap::new();

        for (state, &mass) in &layer {
            summary.expected_score += mass * state.score as f64;

            let (action, after) = chosen_transition(solver, state)?;
            match action {
                Action::Reactivate => summary.p_reactivate += mass,
                Action::Acquire => summary.p_acquire += mass,
                Action::Promote => summary.p_promote += mass,
            }

            for (retired, prob) in table.outcomes(after.active) {
                let next = resolve_outcome(&after, retired);
                if next.score == 0 {
                    summary.p_bust += mass * prob;
                }
                *next_layer.entry(next).or_insert(0.0) += mass * prob;
            }
        }

        debug!(
            "  Round {}/{}: {} active states, E[score]={:.4}, P(bust)={:.4}",
            round,
            solver.horizon(),
            summary.reachable_states,
            summary.expected_score,
            summary.p_bust
        );
        rounds.push(summary);
        layer = next_layer;
    }

    let mut by_score: BTreeMap<u16, f64> = BTreeMap::new();
    for (state, mass) in &layer {
        *by_score.entry(state.score).or_insert(0.0) += mass;
    }
    let expected_final_score = by_score
        .iter()
        .map(|(&score, &mass)| score as f64 * mass)
        .sum();
    let final_distribution = by_score
        .into_iter()
        .map(|(score, mass)| ScoreMass { score, mass })
        .collect();

    Ok(ForwardPassResult {
        rounds,
        final_distribution,
        expected_final_score,
    })
}

/// Action taken in `state` under the solved policy and the post-action state.
fn chosen_transition(solver: &Solver, state: &GameState) -> Result<(Action, GameState), PromoError> {
    if let Some(after) = reactivate(state) {
        return Ok((Action::Reactivate, after));
    }
    let missing = || PromoError::MissingDecision {
        round: state.round,
        score: state.score,
        active: state.active.to_string(),
    };
    let decision = solver
        .decision(state.round, state.score, state.active)
        .ok_or_else(missing)?;
    let after = apply_action(state, decision.action).ok_or_else(missing)?;
    Ok((decision.action, after))
}
