//! Hero classes, effective combat stats, and the hero provider interface.
//!
//! Heroes live outside the combat core. The provider resolves a hero identity
//! to a [`HeroProfile`] whose stats already include equipped-item bonuses and
//! level scaling; the session copies them once at start.

use bitflags::bitflags;

use crate::state::HeroId;

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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HeroClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
    Ranger,
    Paladin,
}

bitflags! {
    /// Set of hero classes, used to match party-combo requirements.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ClassSet: u8 {
        const WARRIOR = 1 << 0;
        const MAGE = 1 << 1;
        const ROGUE = 1 << 2;
        const CLERIC = 1 << 3;
        const RANGER = 1 << 4;
        const PALADIN = 1 << 5;
    }
}

impl From<HeroClass> for ClassSet {
    fn from(class: HeroClass) -> Self {
        match class {
            HeroClass::Warrior => Self::WARRIOR,
            HeroClass::Mage => Self::MAGE,
            HeroClass::Rogue => Self::ROGUE,
            HeroClass::Cleric => Self::CLERIC,
            HeroClass::Ranger => Self::RANGER,
            HeroClass::Paladin => Self::PALADIN,
        }
    }
}

impl ClassSet {
    pub fn of(classes: impl IntoIterator<Item = HeroClass>) -> Self {
        classes
            .into_iter()
            .fold(Self::empty(), |set, class| set | Self::from(class))
    }
}

/// Effective stats of a hero for one encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub max_health: u32,
    pub level: u32,
}

/// Hero as resolved by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroProfile {
    pub id: HeroId,
    pub name: String,
    pub class: HeroClass,
    pub stats: CombatStats,
    /// Accumulated experience, used for level-up computation.
    pub experience: u64,
}

/// Hero/item provider.
pub trait HeroOracle: Send + Sync {
    /// Resolves a hero with equipment and level already folded into its stats.
    fn hero(&self, id: HeroId) -> Option<HeroProfile>;

    /// Level the hero would reach after gaining `experience`, if it changes.
    fn level_after(&self, id: HeroId, experience: u64) -> Option<u32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_set_matches_subsets() {
        let party = ClassSet::of([HeroClass::Warrior, HeroClass::Cleric, HeroClass::Mage]);
        assert!(party.contains(ClassSet::of([HeroClass::Warrior, HeroClass::Cleric])));
        assert!(!party.contains(ClassSet::of([HeroClass::Rogue])));
        assert!(party.contains(ClassSet::empty()));
    }
}
