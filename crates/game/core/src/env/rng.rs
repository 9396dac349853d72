//! RNG oracle for deterministic random number generation.
//!
//! Every draw in an encounter is keyed by a seed derived from the session seed,
//! the session nonce, the acting combatant, and a per-action roll context. Given
//! the same session seed and action sequence, an encounter replays identically.

use std::collections::VecDeque;
use std::sync::Mutex;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Used for percentage mechanics: critical hits and special-attack procs.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides.max(1)) + 1
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state. Stateless here; the state is
/// the seed supplied by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Replays a fixed script of raw values, then falls back to [`PcgRng`].
///
/// Values are consumed in call order regardless of seed. Use it to pin dice
/// results in tests and when reproducing a reported encounter.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    values: Mutex<VecDeque<u32>>,
}

impl ScriptedRng {
    /// Scripts raw `next_u32` outputs.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }

    /// Scripts die results: each `r` makes the next `roll_die`/`roll_d100`
    /// return `r`, provided `r` does not exceed the number of sides.
    pub fn from_rolls(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self::new(rolls.into_iter().map(|roll| roll.saturating_sub(1)))
    }

    /// Appends more die results to the script.
    pub fn push_rolls(&self, rolls: impl IntoIterator<Item = u32>) {
        if let Ok(mut values) = self.values.lock() {
            values.extend(rolls.into_iter().map(|roll| roll.saturating_sub(1)));
        }
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.lock().map(|values| values.len()).unwrap_or(0)
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let scripted = self
            .values
            .lock()
            .ok()
            .and_then(|mut values| values.pop_front());
        scripted.unwrap_or_else(|| PcgRng.next_u32(seed))
    }
}

/// Roll contexts used when one action needs several independent draws.
pub mod context {
    /// Primary success check (hero die, enemy attack die).
    pub const CHECK: u32 = 0;
    /// Critical-hit percentage roll.
    pub const CRITICAL: u32 = 1;
    /// Special-attack proc roll.
    pub const SPECIAL: u32 = 2;
}

/// Compute deterministic seed from session components.
///
/// # Arguments
///
/// * `session_seed` - Seed fixed when the session started
/// * `nonce` - Action sequence number (increments each action)
/// * `actor` - Stable numeric key of the acting combatant
/// * `context` - Distinguishes multiple rolls in the same action (see [`context`])
pub fn compute_seed(session_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash multipliers
    let mut hash = session_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        for seed in [0u64, 1, 42, u64::MAX] {
            assert_eq!(rng.next_u32(seed), rng.next_u32(seed));
        }
    }

    #[test]
    fn seeds_differ_by_context() {
        let a = compute_seed(7, 3, 1, context::CHECK);
        let b = compute_seed(7, 3, 1, context::CRITICAL);
        let c = compute_seed(7, 4, 1, context::CHECK);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn scripted_rolls_replay_in_order_then_fall_back() {
        let rng = ScriptedRng::from_rolls([15, 3]);
        assert_eq!(rng.roll_die(99, 20), 15);
        assert_eq!(rng.roll_d100(99), 3);
        assert_eq!(rng.remaining(), 0);

        let fallback = rng.roll_die(5, 6);
        assert_eq!(fallback, PcgRng.roll_die(5, 6));
    }
}
