//! Game rules: per-round actions and outcome resolution.
//!
//! A round is split in two halves. First an action rewrites the pools
//! ([`reactivate`], [`acquire`] or [`promote`]); the round index is unchanged.
//! Then [`resolve_outcome`] applies one joint retire outcome to the
//! post-action pools and advances to the next round.

use crate::constants::*;
use crate::types::{Action, GameState, Pool};

/// Forced action: move one die from the highest non-empty backlog tier back
/// to the active pool at the same tier. `None` when the backlog is empty.
pub fn reactivate(state: &GameState) -> Option<GameState> {
    let tier = state.backlog.highest_occupied()?;
    let mut next = *state;
    next.backlog.remove(tier, 1);
    next.active.add(tier, 1);
    Some(next)
}

/// Add one new die at the lowest tier.
pub fn acquire(state: &GameState) -> GameState {
    let mut next = *state;
    next.active.add(TIER_D4, 1);
    next
}

/// Move one die from the lowest active tier below the top up by one tier.
/// `None` when every active die already sits at [`TOP_TIER`] (or there are none).
pub fn promote(state: &GameState) -> Option<GameState> {
    let tier = state.active.lowest_promotable()?;
    let mut next = *state;
    next.active.remove(tier, 1);
    next.active.add(tier + 1, 1);
    Some(next)
}

/// Apply `action` to `state`. `None` if the action is not available.
pub fn apply_action(state: &GameState, action: Action) -> Option<GameState> {
    match action {
        Action::Reactivate => reactivate(state),
        Action::Acquire if !state.has_backlog() => Some(acquire(state)),
        Action::Promote if !state.has_backlog() => promote(state),
        _ => None,
    }
}

/// Resolve one joint outcome of the post-action `state`.
///
/// Retired dice move to the backlog of their tier, retained dice stay active.
/// A positive yield is added to the score; a zero yield busts the score to 0.
pub fn resolve_outcome(state: &GameState, retired: Pool) -> GameState {
    let mut active = state.active;
    let mut backlog = state.backlog;
    for tier in 0..TIER_COUNT {
        active.remove(tier, retired[tier]);
        backlog.add(tier, retired[tier]);
    }
    let gained = active.total();
    let score = if gained > 0 {
        state.score + gained as u16
    } else {
        0
    };
    GameState {
        round: state.round + 1,
        score,
        active,
        backlog,
    }
}
