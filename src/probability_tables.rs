//! Probability model: per-tier binomial retire distributions.
//!
//! [`RetireTable::build`] runs three sub-steps once, before any solving:
//!
//! 1. **Binomial coefficients** — C(N, k) for N, k in 0..=MAX_DICE via the
//!    multiplicative recurrence C(N, k+1) = C(N, k) · (N − k) / (k + 1)
//! 2. **Power tables** — p^i and q^i per tier, with p = 1/faces (retire) and
//!    q = 1 − p (retain)
//! 3. **Retire distribution** — P(N, k, tier) = C(N, k) · p^k · q^(N−k), the
//!    probability that exactly k of N dice of the tier retire this round
//!
//! Tiers resolve independently, so the joint outcome of a whole pool is the
//! product of per-tier entries. [`RetireTable::outcomes`] enumerates that
//! outer product as an owned iterator.

use serde::Serialize;

use crate::constants::*;
use crate::types::Pool;

/// Row length of every per-tier distribution: k in 0..=MAX_DICE.
const ROW: usize = MAX_DICE + 1;

/// C(N, k) for N, k in 0..=MAX_DICE (zero above the diagonal).
pub fn precompute_binomials() -> [[f64; ROW]; ROW] {
    let mut n_choose_k = [[0.0f64; ROW]; ROW];
    for n in 0..ROW {
        n_choose_k[n][0] = 1.0;
        for k in 0..n {
            n_choose_k[n][k + 1] = n_choose_k[n][k] * (n - k) as f64 / (k + 1) as f64;
        }
    }
    n_choose_k
}

/// Powers of the retire and retain probability per tier: `(pow_p, pow_q)`.
pub fn precompute_powers() -> ([[f64; ROW]; TIER_COUNT], [[f64; ROW]; TIER_COUNT]) {
    let mut pow_p = [[0.0f64; ROW]; TIER_COUNT];
    let mut pow_q = [[0.0f64; ROW]; TIER_COUNT];
    for tier in 0..TIER_COUNT {
        let p = retire_probability(tier);
        let q = retain_probability(tier);
        pow_p[tier][0] = 1.0;
        pow_q[tier][0] = 1.0;
        for i in 0..MAX_DICE {
            pow_p[tier][i + 1] = pow_p[tier][i] * p;
            pow_q[tier][i + 1] = pow_q[tier][i] * q;
        }
    }
    (pow_p, pow_q)
}

/// Immutable table of P(N, k, tier).
///
/// Stored tier-major (`probs[tier][N][k]`) so that the distribution of one
/// tier and pool size is a contiguous row.
#[derive(Clone)]
pub struct RetireTable {
    probs: [[[f64; ROW]; ROW]; TIER_COUNT],
}

impl RetireTable {
    pub fn build() -> Self {
        let n_choose_k = precompute_binomials();
        let (pow_p, pow_q) = precompute_powers();

        let mut probs = [[[0.0f64; ROW]; ROW]; TIER_COUNT];
        for tier in 0..TIER_COUNT {
            for n in 0..ROW {
                for k in 0..=n {
                    probs[tier][n][k] = n_choose_k[n][k] * pow_p[tier][k] * pow_q[tier][n - k];
                }
            }
        }
        Self { probs }
    }

    /// Probability that exactly `k` of `n` dice of `tier` retire.
    #[inline(always)]
    pub fn probability(&self, n: usize, k: usize, tier: usize) -> f64 {
        debug_assert!(n <= MAX_DICE && k <= MAX_DICE, "n={} k={} out of range", n, k);
        self.probs[tier][n][k]
    }

    /// Retire-count distribution for `n` dice of `tier` (length n + 1).
    #[inline(always)]
    pub fn distribution(&self, n: usize, tier: usize) -> &[f64] {
        &self.probs[tier][n][..=n]
    }

    /// Joint retire outcomes of `active`, each paired with its probability.
    ///
    /// The iterator owns a copy of the relevant rows, so callers may keep
    /// mutating whatever owns the table while iterating.
    pub fn outcomes(&self, active: Pool) -> Outcomes {
        let mut dist = [[0.0f64; ROW]; TIER_COUNT];
        for tier in 0..TIER_COUNT {
            let n = active[tier] as usize;
            dist[tier][..=n].copy_from_slice(self.distribution(n, tier));
        }
        Outcomes {
            active,
            dist,
            retired: [0; TIER_COUNT],
            done: false,
        }
    }
}

/// Odometer over every per-tier retire count vector `0..=active[t]`.
///
/// Yields `(retired, probability)`; the probabilities of one full enumeration
/// sum to 1 up to rounding.
pub struct Outcomes {
    active: Pool,
    dist: [[f64; ROW]; TIER_COUNT],
    retired: [u8; TIER_COUNT],
    done: bool,
}

impl Outcomes {
    /// Number of outcomes in a full enumeration: Π (active[t] + 1).
    pub fn count_for(active: Pool) -> usize {
        active.0.iter().map(|&n| n as usize + 1).product()
    }
}

impl Iterator for Outcomes {
    type Item = (Pool, f64);

    fn next(&mut self) -> Option<(Pool, f64)> {
        if self.done {
            return None;
        }
        let mut prob = 1.0;
        for tier in 0..TIER_COUNT {
            prob *= self.dist[tier][self.retired[tier] as usize];
        }
        let item = (Pool(self.retired), prob);

        // advance; carry into the next tier on overflow
        self.done = true;
        for tier in 0..TIER_COUNT {
            if self.retired[tier] < self.active[tier] {
                self.retired[tier] += 1;
                self.done = false;
                break;
            }
            self.retired[tier] = 0;
        }
        Some(item)
    }
}

/// One row of the tier promotion table.
#[derive(Clone, Debug, Serialize)]
pub struct TierRow {
    pub tier: usize,
    pub name: &'static str,
    pub faces: u32,
    pub retire_probability: f64,
    /// Drop in retire probability from promoting one tier up (0 for the top tier).
    pub promotion_reduction: f64,
}

/// Retire probability per tier and what a promotion saves.
pub fn promotion_gains() -> Vec<TierRow> {
    (0..TIER_COUNT)
        .map(|tier| {
            let promotion_reduction = if tier < TOP_TIER {
                retire_probability(tier) - retire_probability(tier + 1)
            } else {
                0.0
            };
            TierRow {
                tier,
                name: TIER_NAMES[tier],
                faces: TIER_FACES[tier],
                retire_probability: retire_probability(tier),
                promotion_reduction,
            }
        })
        .collect()
}
