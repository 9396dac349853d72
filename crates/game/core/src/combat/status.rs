//! Status effects: application, stacking, periodic ticks, and expiry.
//!
//! Modifier semantics live in one declarative table ([`EffectType::profile`]).
//! Effects on a combatant are kept sorted by [`EffectType`] so that iteration
//! order is the fixed resolution order (poison, burn, bleed, regeneration, then
//! the duration-only effects).

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::{Combatant, HealthPool};

/// Status effect kinds, declared in resolution order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectType {
    Poison,
    Burn,
    Bleed,
    Regeneration,
    Stun,
    Weaken,
    Fortify,
    Vulnerable,
    Bless,
    Blind,
}

/// Per-turn effect applied at the turn-pair boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Periodic {
    None,
    /// Damage per point of intensity.
    Damage(u32),
    /// Healing per point of intensity.
    Heal(u32),
}

/// Static modifier record for one effect type. Percentages are per intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectProfile {
    pub periodic: Periodic,
    pub damage_pct: i32,
    pub defense_pct: i32,
    pub crit_pct: i32,
    /// Added to the bearer's required roll.
    pub accuracy_penalty: i32,
    pub skips_turn: bool,
    /// Harmful effects shake the bearer's morale when applied.
    pub harmful: bool,
}

impl EffectProfile {
    const NEUTRAL: Self = Self {
        periodic: Periodic::None,
        damage_pct: 0,
        defense_pct: 0,
        crit_pct: 0,
        accuracy_penalty: 0,
        skips_turn: false,
        harmful: true,
    };
}

impl EffectType {
    pub const fn profile(self) -> EffectProfile {
        let neutral = EffectProfile::NEUTRAL;
        match self {
            Self::Poison => EffectProfile {
                periodic: Periodic::Damage(2),
                ..neutral
            },
            Self::Burn => EffectProfile {
                periodic: Periodic::Damage(3),
                ..neutral
            },
            Self::Bleed => EffectProfile {
                periodic: Periodic::Damage(2),
                ..neutral
            },
            Self::Regeneration => EffectProfile {
                periodic: Periodic::Heal(3),
                harmful: false,
                ..neutral
            },
            Self::Stun => EffectProfile {
                skips_turn: true,
                ..neutral
            },
            Self::Weaken => EffectProfile {
                damage_pct: -10,
                ..neutral
            },
            Self::Fortify => EffectProfile {
                defense_pct: 10,
                harmful: false,
                ..neutral
            },
            Self::Vulnerable => EffectProfile {
                defense_pct: -10,
                ..neutral
            },
            Self::Bless => EffectProfile {
                damage_pct: 10,
                crit_pct: 5,
                harmful: false,
                ..neutral
            },
            Self::Blind => EffectProfile {
                accuracy_penalty: 1,
                ..neutral
            },
        }
    }

    #[inline]
    pub const fn is_periodic(self) -> bool {
        !matches!(self.profile().periodic, Periodic::None)
    }
}

/// A targeted, timed modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectState {
    pub target: Combatant,
    pub effect: EffectType,
    pub remaining_turns: u32,
    pub intensity: u8,
}

/// Aggregated modifiers from every active effect on one combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusModifiers {
    pub damage_pct: i32,
    pub defense_pct: i32,
    pub crit_pct: i32,
    pub accuracy_penalty: i32,
    pub stunned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusTickKind {
    Damage(u32),
    Heal(u32),
    Countdown,
}

/// One effect's contribution to a turn-pair boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTick {
    pub target: Combatant,
    pub effect: EffectType,
    pub kind: StatusTickKind,
    pub remaining_turns: u32,
    pub expired: bool,
}

/// Active effects on one combatant, at most one entry per [`EffectType`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffectState, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectState> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn get(&self, effect: EffectType) -> Option<&StatusEffectState> {
        self.effects.iter().find(|state| state.effect == effect)
    }

    pub fn has(&self, effect: EffectType) -> bool {
        self.get(effect).is_some()
    }

    /// Applies or stacks an effect.
    ///
    /// A new type is inserted in resolution order. An existing type keeps the
    /// longer of the two durations and adds intensity up to `intensity_cap`.
    /// Returns the resulting state, or `None` when no slot is left.
    pub fn apply(
        &mut self,
        target: Combatant,
        effect: EffectType,
        duration: u32,
        intensity: u8,
        intensity_cap: u8,
    ) -> Option<StatusEffectState> {
        match self.effects.binary_search_by(|state| state.effect.cmp(&effect)) {
            Ok(index) => {
                let state = &mut self.effects[index];
                state.remaining_turns = state.remaining_turns.max(duration);
                state.intensity = state.intensity.saturating_add(intensity).min(intensity_cap);
                Some(*state)
            }
            Err(index) => {
                let state = StatusEffectState {
                    target,
                    effect,
                    remaining_turns: duration,
                    intensity: intensity.min(intensity_cap),
                };
                self.effects.try_insert(index, state).ok()?;
                Some(state)
            }
        }
    }

    pub fn modifiers(&self) -> StatusModifiers {
        self.effects
            .iter()
            .fold(StatusModifiers::default(), |mut acc, state| {
                let profile = state.effect.profile();
                let intensity = i32::from(state.intensity);
                acc.damage_pct += profile.damage_pct * intensity;
                acc.defense_pct += profile.defense_pct * intensity;
                acc.crit_pct += profile.crit_pct * intensity;
                acc.accuracy_penalty += profile.accuracy_penalty * intensity;
                acc.stunned |= profile.skips_turn;
                acc
            })
    }

    /// Runs one turn-pair boundary for the bearer.
    ///
    /// Each effect applies its periodic damage or healing to `health`, then
    /// counts down. Effects reaching zero are removed before returning, so no
    /// later resolution step observes them.
    pub fn tick(&mut self, health: &mut HealthPool) -> Vec<StatusTick> {
        let mut ticks = Vec::with_capacity(self.effects.len());

        for state in self.effects.iter_mut() {
            let intensity = u32::from(state.intensity);
            let kind = match state.effect.profile().periodic {
                Periodic::Damage(per) => StatusTickKind::Damage(health.damage(per * intensity)),
                Periodic::Heal(per) => StatusTickKind::Heal(health.heal(per * intensity)),
                Periodic::None => StatusTickKind::Countdown,
            };
            state.remaining_turns = state.remaining_turns.saturating_sub(1);

            ticks.push(StatusTick {
                target: state.target,
                effect: state.effect,
                kind,
                remaining_turns: state.remaining_turns,
                expired: state.remaining_turns == 0,
            });
        }

        self.effects.retain(|state| state.remaining_turns > 0);
        ticks
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EnemyId;
    use strum::{EnumCount, IntoEnumIterator};

    const ENEMY: Combatant = Combatant::Enemy(EnemyId(1));

    #[test]
    fn every_type_fits_in_one_collection() {
        assert!(EffectType::COUNT <= GameConfig::MAX_STATUS_EFFECTS);

        let mut effects = StatusEffects::new();
        for effect in EffectType::iter().rev() {
            assert!(effects.apply(ENEMY, effect, 2, 1, 3).is_some());
        }
        let order: Vec<_> = effects.iter().map(|state| state.effect).collect();
        assert_eq!(order, EffectType::iter().collect::<Vec<_>>());
    }

    #[test]
    fn poison_ticks_three_times_then_disappears() {
        let mut effects = StatusEffects::new();
        let mut health = HealthPool::full(50);
        effects.apply(ENEMY, EffectType::Poison, 3, 2, 3);

        for turn in 1..=3 {
            let ticks = effects.tick(&mut health);
            assert_eq!(ticks.len(), 1);
            assert_eq!(ticks[0].kind, StatusTickKind::Damage(4));
            assert_eq!(ticks[0].expired, turn == 3);
        }
        assert_eq!(health.current(), 38);
        assert!(!effects.has(EffectType::Poison));
        assert!(effects.tick(&mut health).is_empty());
        assert_eq!(health.current(), 38);
    }

    #[test]
    fn stacking_adds_intensity_and_keeps_longer_duration() {
        let mut effects = StatusEffects::new();
        effects.apply(ENEMY, EffectType::Burn, 4, 2, 3);
        let stacked = effects.apply(ENEMY, EffectType::Burn, 2, 2, 3);

        let stacked = stacked.expect("burn present");
        assert_eq!(stacked.intensity, 3);
        assert_eq!(stacked.remaining_turns, 4);
        assert_eq!(effects.len(), 1);

        let refreshed = effects.apply(ENEMY, EffectType::Burn, 6, 1, 3);
        assert_eq!(refreshed.map(|state| state.remaining_turns), Some(6));
    }

    #[test]
    fn periodic_effects_resolve_in_fixed_order() {
        let mut effects = StatusEffects::new();
        let mut health = HealthPool::new(10, 40);
        effects.apply(ENEMY, EffectType::Regeneration, 2, 1, 3);
        effects.apply(ENEMY, EffectType::Bleed, 2, 1, 3);
        effects.apply(ENEMY, EffectType::Poison, 2, 1, 3);

        let order: Vec<_> = effects
            .tick(&mut health)
            .into_iter()
            .map(|tick| tick.effect)
            .collect();
        assert_eq!(
            order,
            vec![EffectType::Poison, EffectType::Bleed, EffectType::Regeneration]
        );
        // 10 - 2 - 2 + 3
        assert_eq!(health.current(), 9);
    }

    #[test]
    fn modifiers_scale_with_intensity() {
        let mut effects = StatusEffects::new();
        effects.apply(ENEMY, EffectType::Weaken, 2, 2, 3);
        effects.apply(ENEMY, EffectType::Bless, 2, 1, 3);
        effects.apply(ENEMY, EffectType::Vulnerable, 2, 3, 3);
        effects.apply(ENEMY, EffectType::Blind, 2, 2, 3);
        effects.apply(ENEMY, EffectType::Stun, 1, 1, 3);

        let modifiers = effects.modifiers();
        assert_eq!(modifiers.damage_pct, -10);
        assert_eq!(modifiers.crit_pct, 5);
        assert_eq!(modifiers.defense_pct, -30);
        assert_eq!(modifiers.accuracy_penalty, 2);
        assert!(modifiers.stunned);
    }

    #[test]
    fn effect_names_parse() {
        assert_eq!("poison".parse::<EffectType>().ok(), Some(EffectType::Poison));
        assert_eq!("Regeneration".parse::<EffectType>().ok(), Some(EffectType::Regeneration));
        assert_eq!(EffectType::Vulnerable.as_ref(), "vulnerable");
    }
}
