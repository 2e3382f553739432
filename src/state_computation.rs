//! Backward induction over expectations: the decision and transition engines.
//!
//! [`Solver::value`] is the decision engine. For a state S it returns the
//! optimal expected final score:
//!
//! - **Terminal**: `round == horizon` → the current score
//! - **Memo hit**: the cached value, no enumeration
//! - **Forced reactivation**: any backlog → resolve the pools after moving one
//!   die back from the highest backlog tier; no decision is recorded
//! - **Free choice**: resolve both acquire and promote (0 if unavailable), keep
//!   the larger (ties to acquire) and record the decision
//!
//! [`Solver::resolve`] is the transition engine: the probability-weighted sum
//! of `value(next)` over every joint retire outcome of the post-action pools.
//!
//! The recursion is depth-first and acyclic because every resolution advances
//! the round by one, so the depth never exceeds the horizon. Each distinct
//! state is evaluated at most once.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info};
use serde::Serialize;

use crate::constants::*;
use crate::error::PromoError;
use crate::game_mechanics::{acquire, promote, reactivate, resolve_outcome};
use crate::probability_tables::RetireTable;
use crate::types::{Decision, GameState, Pool};

/// Seconds between progress log lines.
const PROGRESS_INTERVAL_SECS: f64 = 2.0;

/// Policy record key within one round: (score, pre-action active pool).
pub type PolicyKey = (u16, Pool);

/// Work counters for one solver instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    /// Distinct non-terminal states evaluated (= value memo size).
    pub states_evaluated: u64,
    /// Lookups answered from the value memo.
    pub memo_hits: u64,
    /// States resolved under a forced reactivation.
    pub forced_states: u64,
    /// Transition-engine calls.
    pub resolutions: u64,
    /// Joint outcomes enumerated across all resolutions.
    pub outcomes_enumerated: u64,
}

/// Progress tracker for long solves.
struct ComputeProgress {
    start_time: Instant,
    last_report_time: Instant,
}

impl ComputeProgress {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_report_time: now,
        }
    }

    fn print_progress(&mut self, stats: &SolveStats) {
        if stats.states_evaluated % 4096 != 0 {
            return;
        }
        let now = Instant::now();
        if now.duration_since(self.last_report_time).as_secs_f64() < PROGRESS_INTERVAL_SECS {
            return;
        }
        self.last_report_time = now;

        let elapsed = now.duration_since(self.start_time).as_secs_f64();
        info!(
            "Progress: {} states | {} outcomes | Elapsed: {:.1}s | Rate: {:.0} states/s",
            stats.states_evaluated,
            stats.outcomes_enumerated,
            elapsed,
            stats.states_evaluated as f64 / elapsed
        );
    }
}

/// Exact solver owning the probability table, value memo and policy record.
///
/// Independent instances share nothing, so tests can solve several games
/// side by side.
pub struct Solver {
    table: RetireTable,
    horizon: u8,
    values: HashMap<GameState, f64>,
    policy: Vec<HashMap<PolicyKey, Decision>>,
    stats: SolveStats,
    progress: ComputeProgress,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Solver for the full game of [`ROUNDS`] rounds.
    pub fn new() -> Self {
        Self::build(ROUNDS as u8)
    }

    /// Solver for the first `horizon` rounds of the same game.
    pub fn with_horizon(horizon: usize) -> Result<Self, PromoError> {
        if horizon > ROUNDS {
            return Err(PromoError::InvalidHorizon {
                horizon,
                max: ROUNDS,
            });
        }
        Ok(Self::build(horizon as u8))
    }

    fn build(horizon: u8) -> Self {
        let t0 = Instant::now();
        let table = RetireTable::build();
        debug!(
            "Retire table built in {:.3} ms",
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Self {
            table,
            horizon,
            values: HashMap::new(),
            policy: vec![HashMap::new(); horizon as usize],
            stats: SolveStats::default(),
            progress: ComputeProgress::new(),
        }
    }

    pub fn horizon(&self) -> u8 {
        self.horizon
    }

    pub fn table(&self) -> &RetireTable {
        &self.table
    }

    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    /// Optimal expected final score from the initial state.
    pub fn solve(&mut self) -> f64 {
        info!("=== Solving {} rounds ===", self.horizon);
        let start = Instant::now();
        self.progress = ComputeProgress::new();

        let root = self.value(&GameState::INITIAL);

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            "Solved in {:.2}s: {} states, {} memo hits, {} resolutions, {} outcomes",
            elapsed,
            self.stats.states_evaluated,
            self.stats.memo_hits,
            self.stats.resolutions,
            self.stats.outcomes_enumerated
        );
        root
    }

    /// Decision engine: optimal expected final score from `state`.
    pub fn value(&mut self, state: &GameState) -> f64 {
        if state.round >= self.horizon {
            return state.score as f64;
        }
        if let Some(&v) = self.values.get(state) {
            self.stats.memo_hits += 1;
            return v;
        }

        let value = if let Some(next) = reactivate(state) {
            self.stats.forced_states += 1;
            self.resolve(&next)
        } else {
            let acquire_value = self.resolve(&acquire(state));
            let promote_value = promote(state).map(|next| self.resolve(&next));
            let decision = Decision::choose(acquire_value, promote_value);
            // With an empty backlog (score, active) identifies the whole state,
            // so a key is never written twice.
            self.policy[state.round as usize]
                .entry((state.score, state.active))
                .or_insert(decision);
            decision.value()
        };

        let previous = self.values.insert(*state, value);
        debug_assert!(previous.is_none(), "state {:?} evaluated twice", state);
        self.stats.states_evaluated += 1;
        self.progress.print_progress(&self.stats);
        value
    }

    /// Transition engine: expected `value` after resolving the post-action
    /// pools of `state`, which advances to round + 1.
    pub fn resolve(&mut self, state: &GameState) -> f64 {
        self.stats.resolutions += 1;
        let mut expected = 0.0;
        for (retired, prob) in self.table.outcomes(state.active) {
            self.stats.outcomes_enumerated += 1;
            let next = resolve_outcome(state, retired);
            expected += prob * self.value(&next);
        }
        expected
    }

    /// Memoized value of `state`, if it has been evaluated.
    pub fn cached_value(&self, state: &GameState) -> Option<f64> {
        self.values.get(state).copied()
    }

    /// Recorded free-choice decision for (round, score, active).
    pub fn decision(&self, round: u8, score: u16, active: Pool) -> Option<&Decision> {
        self.policy.get(round as usize)?.get(&(score, active))
    }

    /// All recorded decisions of one round.
    pub fn decisions(&self, round: usize) -> impl Iterator<Item = (&PolicyKey, &Decision)> + '_ {
        self.policy.get(round).into_iter().flat_map(|m| m.iter())
    }

    /// Number of memoized states per round, for rounds 0..horizon.
    pub fn states_per_round(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.horizon as usize];
        for state in self.values.keys() {
            counts[state.round as usize] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    /// Naive reference: no memo, every die resolved as its own Bernoulli trial.
    fn reference_value(state: &GameState, horizon: u8) -> f64 {
        if state.round >= horizon {
            return state.score as f64;
        }
        if let Some(next) = reactivate(state) {
            return reference_resolve(&next, horizon);
        }
        let a = reference_resolve(&acquire(state), horizon);
        let p = promote(state)
            .map(|next| reference_resolve(&next, horizon))
            .unwrap_or(0.0);
        if a >= p {
            a
        } else {
            p
        }
    }

    fn reference_resolve(state: &GameState, horizon: u8) -> f64 {
        let mut dice = Vec::new();
        for tier in 0..TIER_COUNT {
            for _ in 0..state.active[tier] {
                dice.push(tier);
            }
        }
        let mut total = 0.0;
        for mask in 0u32..(1 << dice.len()) {
            let mut prob = 1.0;
            let mut retired = Pool::EMPTY;
            for (i, &tier) in dice.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    prob *= 1.0 / TIER_FACES[tier] as f64;
                    retired.add(tier, 1);
                } else {
                    prob *= 1.0 - 1.0 / TIER_FACES[tier] as f64;
                }
            }
            total += prob * reference_value(&resolve_outcome(state, retired), horizon);
        }
        total
    }

    #[test]
    fn one_round_is_one_d4() {
        let mut solver = Solver::with_horizon(1).unwrap();
        assert_eq!(solver.solve(), 0.75);
        let d = solver.decision(0, 0, Pool::EMPTY).unwrap();
        assert_eq!(d.action, Action::Acquire);
        assert_eq!(d.promote_value, None);
    }

    #[test]
    fn two_rounds_hand_computed() {
        // after round 0: 3/4 → score 1 with one d4, 1/4 → bust with a d4 in backlog
        // score 1, acquire: 1 + E[yield of 2 d4, bust on 0] = 39/16
        // score 0, forced reactivation of the d4: 3/4
        let mut solver = Solver::with_horizon(2).unwrap();
        let root = solver.solve();
        let expected = 0.75 * (39.0 / 16.0) + 0.25 * 0.75;
        assert!((root - expected).abs() < 1e-12, "root={root}");
        let d = solver.decision(1, 1, Pool::single(TIER_D4, 1)).unwrap();
        assert_eq!(d.action, Action::Acquire);
        assert!((d.promote_value.unwrap() - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn matches_naive_reference() {
        for horizon in 1..=5u8 {
            let mut solver = Solver::with_horizon(horizon as usize).unwrap();
            let fast = solver.solve();
            let slow = reference_value(&GameState::INITIAL, horizon);
            assert!((fast - slow).abs() < 1e-9, "horizon={horizon} fast={fast} slow={slow}");
        }
    }

    #[test]
    fn terminal_state_returns_score() {
        let mut solver = Solver::new();
        let state = GameState::new(
            ROUNDS as u8,
            42,
            Pool::new([1, 2, 3, 0, 1]),
            Pool::single(TIER_D12, 2),
        );
        assert_eq!(solver.value(&state), 42.0);
        assert_eq!(solver.stats(), SolveStats::default());
    }

    #[test]
    fn rejects_horizon_past_game_length() {
        assert!(matches!(
            Solver::with_horizon(ROUNDS + 1),
            Err(PromoError::InvalidHorizon { horizon: 19, max: 18 })
        ));
    }

    #[test]
    fn memo_prevents_recomputation() {
        let mut solver = Solver::with_horizon(6).unwrap();
        let state = GameState::new(2, 3, Pool::new([2, 1, 0, 0, 0]), Pool::EMPTY);
        let first = solver.value(&state);
        let after_first = solver.stats();
        let second = solver.value(&state);
        let after_second = solver.stats();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(after_first.outcomes_enumerated, after_second.outcomes_enumerated);
        assert_eq!(after_second.memo_hits, after_first.memo_hits + 1);
    }

    #[test]
    fn backlog_forces_reactivation_without_record() {
        let mut solver = Solver::with_horizon(6).unwrap();
        let active = Pool::new([1, 0, 0, 1, 0]);
        let state = GameState::new(3, 4, active, Pool::single(TIER_D8, 1));
        let value = solver.value(&state);

        let mut after = state;
        after.backlog = Pool::EMPTY;
        after.active.add(TIER_D8, 1);
        let mut fresh = Solver::with_horizon(6).unwrap();
        assert!((value - fresh.resolve(&after)).abs() < 1e-12);
        assert!(solver.decision(3, 4, active).is_none());
        assert_eq!(solver.stats().forced_states, 1 + fresh.stats().forced_states);
    }
}
