//! Core data structures: dice pools, game states, actions and recorded decisions.
//!
//! [`GameState`] is the composite memo key of the solver. It is a small `Copy`
//! value with structural equality and hashing, so the value memo can be a plain
//! `HashMap<GameState, f64>`.

use std::fmt;
use std::ops::Index;

use serde::Serialize;

use crate::constants::*;

/// Dice count per tier.
///
/// Counts never exceed [`MAX_DICE`], which comfortably fits a `u8`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pool(pub [u8; TIER_COUNT]);

impl Pool {
    pub const EMPTY: Pool = Pool([0; TIER_COUNT]);

    pub fn new(counts: [u8; TIER_COUNT]) -> Self {
        Pool(counts)
    }

    /// Pool holding `count` dice of a single tier.
    pub fn single(tier: usize, count: u8) -> Self {
        let mut pool = Pool::EMPTY;
        pool.0[tier] = count;
        pool
    }

    #[inline(always)]
    pub fn count(&self, tier: usize) -> u8 {
        self.0[tier]
    }

    /// Total number of dice across all tiers.
    #[inline(always)]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&c| c as u32).sum()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Highest tier holding at least one die.
    pub fn highest_occupied(&self) -> Option<usize> {
        (0..TIER_COUNT).rev().find(|&t| self.0[t] > 0)
    }

    /// Lowest tier below [`TOP_TIER`] holding at least one die.
    pub fn lowest_promotable(&self) -> Option<usize> {
        (0..TOP_TIER).find(|&t| self.0[t] > 0)
    }

    #[inline(always)]
    pub fn add(&mut self, tier: usize, n: u8) {
        self.0[tier] += n;
    }

    #[inline(always)]
    pub fn remove(&mut self, tier: usize, n: u8) {
        debug_assert!(self.0[tier] >= n, "removing {} dice from {} at tier {}", n, self.0[tier], tier);
        self.0[tier] -= n;
    }
}

impl Index<usize> for Pool {
    type Output = u8;

    fn index(&self, tier: usize) -> &u8 {
        &self.0[tier]
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (t, &c) in self.0.iter().enumerate() {
            if t > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", TIER_NAMES[t], c)?;
        }
        write!(f, "]")
    }
}

/// Full game state S = (round, score, active, backlog).
///
/// - `round`: rounds already resolved, 0..=ROUNDS
/// - `score`: accumulated score, reset to 0 by a zero-yield round
/// - `active`: dice resolved this round
/// - `backlog`: retired dice waiting to be reactivated, highest tier first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GameState {
    pub round: u8,
    pub score: u16,
    pub active: Pool,
    pub backlog: Pool,
}

impl GameState {
    /// Round 0, score 0, no dice anywhere.
    pub const INITIAL: GameState = GameState {
        round: 0,
        score: 0,
        active: Pool::EMPTY,
        backlog: Pool::EMPTY,
    };

    pub fn new(round: u8, score: u16, active: Pool, backlog: Pool) -> Self {
        Self {
            round,
            score,
            active,
            backlog,
        }
    }

    /// Dice owned by the player, active or not.
    #[inline(always)]
    pub fn total_dice(&self) -> u32 {
        self.active.total() + self.backlog.total()
    }

    #[inline(always)]
    pub fn has_backlog(&self) -> bool {
        !self.backlog.is_empty()
    }
}

/// Per-round action.
///
/// `Reactivate` is forced whenever the backlog is non-empty. `Acquire` and
/// `Promote` are the two candidates of a free choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Reactivate,
    Acquire,
    Promote,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Reactivate => "reactivate",
            Action::Acquire => "acquire",
            Action::Promote => "promote",
        };
        f.write_str(name)
    }
}

/// A free choice recorded in the policy table, with both candidate values.
///
/// `promote_value` is `None` when promotion was unavailable (no die below the
/// top tier); it then counts as 0 in the comparison.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub acquire_value: f64,
    pub promote_value: Option<f64>,
}

impl Decision {
    /// Pick the better candidate. Ties go to acquire.
    pub fn choose(acquire_value: f64, promote_value: Option<f64>) -> Self {
        let action = if acquire_value >= promote_value.unwrap_or(0.0) {
            Action::Acquire
        } else {
            Action::Promote
        };
        Self {
            action,
            acquire_value,
            promote_value,
        }
    }

    /// Value of the chosen action.
    pub fn value(&self) -> f64 {
        match self.action {
            Action::Acquire => self.acquire_value,
            Action::Promote => self.promote_value.unwrap_or(0.0),
            Action::Reactivate => unreachable!("reactivation is never a recorded choice"),
        }
    }

    /// Value of the action that was not chosen.
    pub fn alternative_value(&self) -> f64 {
        match self.action {
            Action::Acquire => self.promote_value.unwrap_or(0.0),
            Action::Promote => self.acquire_value,
            Action::Reactivate => unreachable!("reactivation is never a recorded choice"),
        }
    }
}
