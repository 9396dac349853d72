//! Boss phase escalation.
//!
//! A boss starts in phase 1 with its base definition. Each configured
//! [`BossPhase`] is entered once the boss's health fraction drops strictly below
//! the phase threshold. Phases never revert.

use crate::combat::status::EffectType;
use crate::state::{EnemyId, HealthPool};

/// Overrides that apply from the moment a phase is entered.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossPhase {
    /// Health percentage below which this phase begins.
    pub threshold_pct: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: Option<u32>,
    /// Replaces the enemy's base minimum roll.
    #[cfg_attr(feature = "serde", serde(default))]
    pub minimum_roll: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub immunities: Vec<EffectType>,
}

/// Escalation table of a boss. `phases[0]` is phase 2, ordered by descending threshold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossProfile {
    pub phases: Vec<BossPhase>,
}

/// Cumulative overrides of every phase entered so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseOverrides {
    pub power: Option<u32>,
    pub minimum_roll: Option<u32>,
    pub immunities: Vec<EffectType>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseTransition {
    pub enemy: EnemyId,
    pub from: u8,
    pub to: u8,
    pub threshold_pct: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossState {
    phase: u8,
}

impl BossState {
    pub const fn new() -> Self {
        Self { phase: 1 }
    }

    #[inline]
    pub const fn phase(&self) -> u8 {
        self.phase
    }

    /// Enters every phase whose threshold the current health has crossed.
    ///
    /// Returns one transition per phase entered. A single heavy hit may cross
    /// several thresholds at once.
    pub fn advance(
        &mut self,
        profile: &BossProfile,
        health: &HealthPool,
        enemy: EnemyId,
    ) -> Vec<PhaseTransition> {
        let mut transitions = Vec::new();
        loop {
            let Some(next) = profile.phases.get(usize::from(self.phase) - 1) else {
                break;
            };
            if !health.is_below_percent(next.threshold_pct) {
                break;
            }
            transitions.push(PhaseTransition {
                enemy,
                from: self.phase,
                to: self.phase + 1,
                threshold_pct: next.threshold_pct,
            });
            self.phase += 1;
        }
        transitions
    }

    pub fn overrides(&self, profile: &BossProfile) -> PhaseOverrides {
        let entered = usize::from(self.phase).saturating_sub(1);
        profile
            .phases
            .iter()
            .take(entered)
            .fold(PhaseOverrides::default(), |mut acc, phase| {
                acc.power = phase.power.or(acc.power);
                acc.minimum_roll = phase.minimum_roll.or(acc.minimum_roll);
                for immunity in &phase.immunities {
                    if !acc.immunities.contains(immunity) {
                        acc.immunities.push(*immunity);
                    }
                }
                acc
            })
    }
}

impl Default for BossState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOSS: EnemyId = EnemyId(9);

    fn profile() -> BossProfile {
        BossProfile {
            phases: vec![
                BossPhase {
                    threshold_pct: 50,
                    power: Some(14),
                    minimum_roll: Some(14),
                    immunities: vec![EffectType::Stun],
                },
                BossPhase {
                    threshold_pct: 20,
                    power: Some(18),
                    minimum_roll: None,
                    immunities: vec![EffectType::Poison],
                },
            ],
        }
    }

    #[test]
    fn crossing_fifty_percent_enters_phase_two_once() {
        let profile = profile();
        let mut state = BossState::new();
        let mut health = HealthPool::full(100);
        health.damage(45);
        assert!(state.advance(&profile, &health, BOSS).is_empty());

        health.damage(10);
        let transitions = state.advance(&profile, &health, BOSS);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from, 1);
        assert_eq!(transitions[0].to, 2);
        assert_eq!(state.phase(), 2);

        assert!(state.advance(&profile, &health, BOSS).is_empty());
    }

    #[test]
    fn phases_never_revert_on_healing() {
        let profile = profile();
        let mut state = BossState::new();
        let mut health = HealthPool::full(100);
        health.damage(85);
        assert_eq!(state.advance(&profile, &health, BOSS).len(), 2);

        health.heal(100);
        assert!(state.advance(&profile, &health, BOSS).is_empty());
        assert_eq!(state.phase(), 3);
    }

    #[test]
    fn overrides_accumulate_latest_values() {
        let profile = profile();
        let mut state = BossState::new();
        assert_eq!(state.overrides(&profile), PhaseOverrides::default());

        state.advance(&profile, &HealthPool::new(10, 100), BOSS);
        let overrides = state.overrides(&profile);
        assert_eq!(overrides.power, Some(18));
        assert_eq!(overrides.minimum_roll, Some(14));
        assert_eq!(overrides.immunities, vec![EffectType::Stun, EffectType::Poison]);
    }
}
