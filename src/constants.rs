//! Game constants and tier metadata.
//!
//! The game instance is fixed at compile time:
//! - [`ROUNDS`] = 18 resolved rounds, round 18 is terminal
//! - [`TIER_COUNT`] = 5 die tiers with [`TIER_FACES`] = {4, 6, 8, 12, 20}
//! - a die retires (rolls a 1) with probability 1/faces, otherwise it retains
//!   and yields one point
//!
//! Upper bounds used to size lookup tables follow from the rules: at most one
//! die is acquired per round, so no pool ever holds more than [`ROUNDS`] dice,
//! and the score can never exceed [`MAX_SCORE`] = 1 + 2 + ... + 18.

/// Number of rounds played. A state with `round == ROUNDS` is terminal.
pub const ROUNDS: usize = 18;

/// Largest reachable score: one new die every round and no die ever retires.
pub const MAX_SCORE: usize = (ROUNDS * (ROUNDS + 1)) / 2;

/// Largest number of dice a single pool can hold.
pub const MAX_DICE: usize = ROUNDS;

/// Number of die tiers.
pub const TIER_COUNT: usize = 5;

/// Tier indices, ordered by face count. Promotion moves a die up one index.
pub const TIER_D4: usize = 0;
pub const TIER_D6: usize = 1;
pub const TIER_D8: usize = 2;
pub const TIER_D12: usize = 3;
pub const TIER_D20: usize = 4;

/// Highest tier; dice here cannot be promoted.
pub const TOP_TIER: usize = TIER_D20;

/// Face count per tier.
pub const TIER_FACES: [u32; TIER_COUNT] = [4, 6, 8, 12, 20];

/// Human-readable tier names.
pub const TIER_NAMES: [&str; TIER_COUNT] = ["d4", "d6", "d8", "d12", "d20"];

/// Probability that a single die of `tier` retires this round (rolls a 1).
#[inline(always)]
pub fn retire_probability(tier: usize) -> f64 {
    1.0 / TIER_FACES[tier] as f64
}

/// Probability that a single die of `tier` retains this round.
#[inline(always)]
pub fn retain_probability(tier: usize) -> f64 {
    1.0 - retire_probability(tier)
}
