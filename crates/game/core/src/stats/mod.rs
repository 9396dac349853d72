//! Effective combat stats from base attributes, level, and equipment.
//!
//! Hero providers use [`compute_combat_stats`] to fold everything a hero brings
//! into the [`CombatStats`] the engine copies at session start.

pub mod bonus;

pub use bonus::{Bonus, BonusStack};

use crate::env::CombatStats;

/// Stat an equipment bonus applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Attack,
    Defense,
    Health,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBonus {
    pub stat: StatKind,
    pub bonus: Bonus,
}

/// Level-1 attributes of a hero before equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseAttributes {
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
}

pub const ATTACK_PER_LEVEL: u32 = 2;
pub const DEFENSE_PER_LEVEL: u32 = 1;
pub const HEALTH_PER_LEVEL: u32 = 10;

/// Level scaling first, then equipment bonuses through a [`BonusStack`] per stat.
///
/// Attack and defense floor at 0, health at 1.
pub fn compute_combat_stats(
    base: &BaseAttributes,
    level: u32,
    bonuses: &[StatBonus],
) -> CombatStats {
    let level = level.max(1);
    let gained = level - 1;

    let stat = |kind: StatKind, scaled: u32, min: i32| -> u32 {
        let stack: BonusStack = bonuses
            .iter()
            .filter(|bonus| bonus.stat == kind)
            .map(|bonus| bonus.bonus)
            .collect();
        let base = i32::try_from(scaled).unwrap_or(i32::MAX);
        stack.apply(base, min, i32::MAX) as u32
    };

    CombatStats {
        attack: stat(
            StatKind::Attack,
            base.attack.saturating_add(gained.saturating_mul(ATTACK_PER_LEVEL)),
            0,
        ),
        defense: stat(
            StatKind::Defense,
            base.defense.saturating_add(gained.saturating_mul(DEFENSE_PER_LEVEL)),
            0,
        ),
        max_health: stat(
            StatKind::Health,
            base.health.saturating_add(gained.saturating_mul(HEALTH_PER_LEVEL)),
            1,
        ),
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: BaseAttributes = BaseAttributes {
        attack: 12,
        defense: 5,
        health: 80,
    };

    #[test]
    fn level_one_without_items_is_base() {
        let stats = compute_combat_stats(&BASE, 1, &[]);
        assert_eq!(stats.attack, 12);
        assert_eq!(stats.defense, 5);
        assert_eq!(stats.max_health, 80);
    }

    #[test]
    fn level_and_items_stack() {
        let items = [
            StatBonus {
                stat: StatKind::Attack,
                bonus: Bonus::Flat(4),
            },
            StatBonus {
                stat: StatKind::Defense,
                bonus: Bonus::Increased(50),
            },
        ];
        let stats = compute_combat_stats(&BASE, 3, &items);
        // 12 + 2×2 + 4
        assert_eq!(stats.attack, 20);
        // (5 + 2) × 1.5 = 10.5 → 10
        assert_eq!(stats.defense, 10);
        assert_eq!(stats.max_health, 100);
        assert_eq!(stats.level, 3);
    }

    #[test]
    fn health_never_drops_to_zero() {
        let items = [StatBonus {
            stat: StatKind::Health,
            bonus: Bonus::Flat(-500),
        }];
        assert_eq!(compute_combat_stats(&BASE, 1, &items).max_health, 1);
    }
}
