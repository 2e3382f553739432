//! End-to-end solver tests on a truncated horizon.
//!
//! The full 18-round game takes a while in debug builds, so these tests share
//! one solved 8-round instance (computed once per test binary).

use std::sync::OnceLock;

use promo::constants::*;
use promo::forward_pass::forward_pass;
use promo::game_mechanics::{acquire, promote, reactivate};
use promo::policy_summary::summarize_rounds;
use promo::state_computation::Solver;
use promo::types::{Action, GameState, Pool};

const HORIZON: usize = 8;

struct Solved {
    solver: Solver,
    root: f64,
}

static SOLVED: OnceLock<Solved> = OnceLock::new();

fn solved() -> &'static Solved {
    SOLVED.get_or_init(|| {
        let mut solver = Solver::with_horizon(HORIZON).unwrap();
        let root = solver.solve();
        Solved { solver, root }
    })
}

#[test]
fn root_value_matches_known_result() {
    // computed independently with a direct per-die enumeration
    assert!((solved().root - 15.227032454416081).abs() < 1e-9, "root={}", solved().root);
    let mut short = Solver::with_horizon(3).unwrap();
    assert!((short.solve() - 3.683349609375).abs() < 1e-12);
}

#[test]
fn root_acquires_a_d4() {
    let s = solved();
    let d = s.solver.decision(0, 0, Pool::EMPTY).unwrap();
    assert_eq!(d.action, Action::Acquire);
    assert_eq!(d.promote_value, None);
    assert_eq!(d.acquire_value, s.root);
}

#[test]
fn root_equals_one_d4_resolution() {
    let s = solved();
    let kept = GameState::new(1, 1, Pool::single(TIER_D4, 1), Pool::EMPTY);
    let retired = GameState::new(1, 0, Pool::EMPTY, Pool::single(TIER_D4, 1));
    let v_kept = s.solver.cached_value(&kept).unwrap();
    let v_retired = s.solver.cached_value(&retired).unwrap();
    let expected = 0.75 * v_kept + 0.25 * v_retired;
    assert!((s.root - expected).abs() < 1e-9, "root={} expected={}", s.root, expected);
}

#[test]
fn recorded_decision_dominates_alternative() {
    let s = solved();
    let mut checked = 0;
    for round in 0..HORIZON {
        for (&(score, active), d) in s.solver.decisions(round) {
            assert!(
                d.value() >= d.alternative_value(),
                "round={round} score={score} active={active} {:?}",
                d
            );
            let state = GameState::new(round as u8, score, active, Pool::EMPTY);
            assert_eq!(s.solver.cached_value(&state), Some(d.value()));
            if d.action == Action::Promote {
                assert!(promote(&state).is_some());
            }
            checked += 1;
        }
    }
    assert!(checked > 100, "only {checked} decisions recorded");
}

#[test]
fn decisions_only_for_empty_backlog() {
    let s = solved();
    let summaries = summarize_rounds(&s.solver);
    for summary in &summaries {
        assert!(summary.entries <= summary.states);
        assert_eq!(summary.entries, summary.acquire + summary.promote);
    }
    // round 1 after a bust holds only the backlog state, which is forced
    assert!(summaries[1].states > summaries[1].entries);
}

#[test]
fn forced_state_has_no_decision() {
    let mut solver = Solver::with_horizon(HORIZON).unwrap();
    let active = Pool::new([2, 0, 0, 0, 0]);
    let state = GameState::new(4, 6, active, Pool::single(TIER_D8, 1));
    let value = solver.value(&state);
    let after = reactivate(&state).unwrap();
    assert_eq!(after.active, Pool::new([2, 0, 1, 0, 0]));
    assert!(after.backlog.is_empty());
    assert!(solver.decision(4, 6, active).is_none());
    assert!(value > 0.0);
}

#[test]
fn independent_solvers_agree() {
    let mut other = Solver::with_horizon(HORIZON).unwrap();
    let root = other.solve();
    assert_eq!(root.to_bits(), solved().root.to_bits());
    assert_eq!(other.stats(), solved().solver.stats());
}

#[test]
fn longer_games_are_worth_more() {
    let mut previous = 0.0;
    for horizon in 1..=6 {
        let mut solver = Solver::with_horizon(horizon).unwrap();
        let root = solver.solve();
        assert!(root > previous, "horizon={horizon} root={root} previous={previous}");
        previous = root;
    }
}

#[test]
fn acquire_candidate_matches_resolution() {
    let s = solved();
    // two kept d4s after two acquisitions: 1 + 2 points
    let state = GameState::new(2, 3, Pool::single(TIER_D4, 2), Pool::EMPTY);
    let d = s.solver.decision(2, 3, state.active).unwrap();
    let mut fresh = Solver::with_horizon(HORIZON).unwrap();
    let acquire_value = fresh.resolve(&acquire(&state));
    assert!((d.acquire_value - acquire_value).abs() < 1e-12);
}

#[test]
fn unreachable_state_has_no_decision() {
    // a bust at round 0 leaves a backlog, so round 1 is forced and the
    // (2, 2, {d4:2}) state never arises
    assert!(solved().solver.decision(2, 2, Pool::single(TIER_D4, 2)).is_none());
}

#[test]
#[ignore = "full 18-round solve; run with --release -- --ignored"]
fn full_game_root_value() {
    let mut solver = Solver::new();
    let root = solver.solve();
    assert!((root - 45.934566673784978).abs() < 1e-9, "root={root}");
}

#[test]
fn forward_pass_reproduces_root() {
    let s = solved();
    let result = forward_pass(&s.solver).unwrap();
    assert_eq!(result.rounds.len(), HORIZON);
    assert!((result.expected_final_score - s.root).abs() < 1e-9);
}
