//! Party combos and boss weaknesses.

use crate::env::ClassSet;
use crate::state::{ComboId, EnemyId, PlayerId};

/// Synergy unlocked by a party containing every class in `required`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyCombo {
    pub id: ComboId,
    pub name: String,
    pub required: ClassSet,
}

impl PartyCombo {
    #[inline]
    pub fn is_satisfied_by(&self, party: ClassSet) -> bool {
        party.contains(self.required)
    }
}

/// Bonus a discovered combo grants against one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossWeakness {
    pub combo: ComboId,
    pub enemy: EnemyId,
    /// Subtracted from the required roll.
    pub roll_reduction: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_bonus_pct: i32,
    /// Reward multipliers in percent (100 = unchanged).
    pub drop_multiplier_pct: u32,
    pub experience_multiplier_pct: u32,
}

pub trait ComboOracle: Send + Sync {
    fn combo(&self, id: ComboId) -> Option<PartyCombo>;

    /// Weaknesses declared against `enemy`.
    fn weaknesses(&self, enemy: EnemyId) -> Vec<BossWeakness>;

    fn is_discovered(&self, player: PlayerId, combo: ComboId) -> bool;
}
