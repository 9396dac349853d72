//! Class special abilities.

use crate::combat::EffectType;
use crate::env::HeroClass;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Damage equal to `power_pct`% of the hero's attack. Skips the dice check.
    Strike { power_pct: u32 },
    /// Restores health to the most wounded living hero.
    Heal { amount: u32 },
    /// Restores health to every living hero.
    PartyHeal { amount: u32 },
}

/// Status effect attached to an ability: applied to the enemy for strikes and
/// to the healed heroes for heals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRider {
    pub effect: EffectType,
    pub duration: u32,
    pub intensity: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub name: String,
    pub effect: AbilityEffect,
    /// Turn pairs the ability stays unavailable after use.
    pub cooldown: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rider: Option<EffectRider>,
}

pub trait AbilityOracle: Send + Sync {
    fn ability(&self, class: HeroClass) -> Option<AbilityDefinition>;
}
