//! # Promo — exact solver for the tiered-dice promotion game
//!
//! Computes the optimal expected final score and the optimal policy for an
//! 18-round dice game with a bust rule, by **backward induction** over
//! expectations on a memoized DAG of game states.
//!
//! ## Rules
//!
//! Each round the player acts, then every active die is rolled:
//!
//! - a die retires (rolls a 1) with probability 1/faces and moves to the
//!   backlog; otherwise it retains and scores one point
//! - a round with zero retained dice resets the score to 0 (bust)
//! - if the backlog is non-empty, the only action is to reactivate one die
//!   from its highest tier
//! - otherwise the player either acquires a new d4 or promotes one die from
//!   the lowest active tier below d20 to the next tier
//!
//! ## Algorithm overview
//!
//! | Step | Rust module | Description |
//! |------|-------------|-------------|
//! | 0 | [`probability_tables`] | Binomial retire distributions P(N, k, tier) for N ≤ 18 |
//! | 1 | [`game_mechanics`] | Action application and outcome resolution (yield, bust, backlog) |
//! | 2 | [`state_computation`] | Memoized decision engine + transition engine |
//! | 3 | [`policy_summary`] | Per-round acquire/promote tallies of the recorded policy |
//! | 4 | [`forward_pass`] | Exact visitation probabilities and final score distribution |
//!
//! ## State representation
//!
//! A state S = (round, score, active, backlog) with both pools stored as
//! five `u8` counts. [`types::GameState`] is the memo key directly; every
//! state is evaluated at most once and recursion depth is bounded by the
//! number of rounds.

#![allow(clippy::needless_range_loop)]

pub mod constants;
pub mod env_config;
pub mod error;
pub mod forward_pass;
pub mod game_mechanics;
pub mod policy_summary;
pub mod probability_tables;
pub mod state_computation;
pub mod types;
