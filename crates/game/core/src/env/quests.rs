//! Quest and enemy catalog interface.

use crate::combat::{BossProfile, DiceType, EffectType};
use crate::state::{EnemyId, ItemId, QuestId};

/// Status effect an enemy may inflict after landing a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpecial {
    pub effect: EffectType,
    pub duration: u32,
    pub intensity: u8,
    /// Percent chance (checked with a d100) per damaging hit.
    pub chance_pct: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDefinition {
    pub id: EnemyId,
    pub name: String,
    pub max_health: u32,
    /// Base attack power, added to the enemy's die roll.
    pub power: u32,
    pub defense: u32,
    /// Base threshold heroes must meet to land a hit.
    pub minimum_roll: u32,
    pub attack_die: DiceType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: Option<BossProfile>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special: Option<EnemySpecial>,
}

impl EnemyDefinition {
    #[inline]
    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }
}

/// Base rewards of a quest, before weakness multipliers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestReward {
    pub gold: u64,
    pub experience: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<ItemId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestDefinition {
    pub id: QuestId,
    pub name: String,
    /// Enemies fought in order.
    pub enemies: Vec<EnemyId>,
    pub reward: QuestReward,
}

pub trait QuestOracle: Send + Sync {
    fn quest(&self, id: QuestId) -> Option<QuestDefinition>;

    fn enemy(&self, id: EnemyId) -> Option<EnemyDefinition>;
}
