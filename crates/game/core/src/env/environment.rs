//! Environmental conditions and their modifier table.

use crate::combat::DiceType;
use crate::config::GameConfig;
use crate::state::QuestId;

/// Weather or terrain affecting a quest.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConditionKind {
    #[default]
    Clear,
    Rain,
    Storm,
    Fog,
    Blizzard,
    Heatwave,
    Sandstorm,
    Night,
}

/// Named percentage modifiers produced by a condition.
///
/// `hazard_damage` is flat damage dealt to every living hero at each turn-pair
/// boundary. Speed and stealth are reported but no combat step consumes them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentalModifiers {
    pub accuracy: i32,
    pub elemental_damage: i32,
    pub defense: i32,
    pub speed: i32,
    pub stealth: i32,
    pub healing: i32,
    pub hazard_damage: u32,
}

impl EnvironmentalModifiers {
    /// Per-intensity table.
    const fn base(kind: ConditionKind) -> Self {
        let (accuracy, elemental_damage, defense, speed, stealth, healing, hazard_damage) =
            match kind {
                ConditionKind::Clear => (0, 0, 0, 0, 0, 0, 0),
                ConditionKind::Rain => (-5, -5, 0, -5, 10, 0, 0),
                ConditionKind::Storm => (-10, 10, -5, -10, 5, 0, 0),
                ConditionKind::Fog => (-15, 0, 0, 0, 20, 0, 0),
                ConditionKind::Blizzard => (-10, -5, -5, -15, 0, -10, 2),
                ConditionKind::Heatwave => (0, 10, -10, -10, 0, -15, 2),
                ConditionKind::Sandstorm => (-15, 0, -5, -10, 15, 0, 1),
                ConditionKind::Night => (-5, 0, 0, 0, 25, 0, 0),
            };
        Self {
            accuracy,
            elemental_damage,
            defense,
            speed,
            stealth,
            healing,
            hazard_damage,
        }
    }

    /// Table row for `kind`, scaled linearly by `intensity` (clamped to 1..=3).
    pub fn for_condition(kind: ConditionKind, intensity: u8) -> Self {
        let base = Self::base(kind);
        let scale = intensity.clamp(GameConfig::MIN_INTENSITY, GameConfig::MAX_INTENSITY);
        let factor = i32::from(scale);
        Self {
            accuracy: base.accuracy * factor,
            elemental_damage: base.elemental_damage * factor,
            defense: base.defense * factor,
            speed: base.speed * factor,
            stealth: base.stealth * factor,
            healing: base.healing * factor,
            hazard_damage: base.hazard_damage * u32::from(scale),
        }
    }

    /// Signed change to a required roll: `-(accuracy% × faces / 100)`, truncated.
    ///
    /// Negative accuracy makes rolls harder.
    pub fn required_roll_adjustment(&self, dice: DiceType) -> i32 {
        -(self.accuracy * dice.faces() as i32 / 100)
    }
}

/// Active condition of a quest, snapshotted when a session starts.
///
/// `duration_turns` is informational; the snapshot stays in force for the
/// whole encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentalCondition {
    pub kind: ConditionKind,
    pub intensity: u8,
    pub duration_turns: u32,
}

impl EnvironmentalCondition {
    pub const fn clear() -> Self {
        Self {
            kind: ConditionKind::Clear,
            intensity: GameConfig::MIN_INTENSITY,
            duration_turns: 0,
        }
    }

    pub fn modifiers(&self) -> EnvironmentalModifiers {
        EnvironmentalModifiers::for_condition(self.kind, self.intensity)
    }
}

/// Read-only lookup of a quest's active environmental condition.
pub trait EnvironmentOracle: Send + Sync {
    /// Returns `None` for quests with no active condition.
    fn active_condition(&self, quest: QuestId) -> Option<EnvironmentalCondition>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn clear_is_neutral() {
        let modifiers = EnvironmentalCondition::clear().modifiers();
        assert_eq!(modifiers, EnvironmentalModifiers::default());
        assert_eq!(modifiers.required_roll_adjustment(DiceType::D20), 0);
    }

    #[test]
    fn intensity_scales_linearly() {
        for kind in ConditionKind::iter() {
            let one = EnvironmentalModifiers::for_condition(kind, 1);
            let three = EnvironmentalModifiers::for_condition(kind, 3);
            assert_eq!(three.accuracy, one.accuracy * 3);
            assert_eq!(three.elemental_damage, one.elemental_damage * 3);
            assert_eq!(three.hazard_damage, one.hazard_damage * 3);
        }
    }

    #[test]
    fn fog_raises_required_roll() {
        let fog = EnvironmentalModifiers::for_condition(ConditionKind::Fog, 2);
        assert_eq!(fog.accuracy, -30);
        assert_eq!(fog.required_roll_adjustment(DiceType::D20), 6);
        // -30% of 6 faces = -1.8, truncated to -1
        assert_eq!(fog.required_roll_adjustment(DiceType::D6), 1);
    }

    #[test]
    fn out_of_range_intensity_is_clamped() {
        let zero = EnvironmentalModifiers::for_condition(ConditionKind::Storm, 0);
        let one = EnvironmentalModifiers::for_condition(ConditionKind::Storm, 1);
        assert_eq!(zero, one);
        let nine = EnvironmentalModifiers::for_condition(ConditionKind::Storm, 9);
        assert_eq!(nine.elemental_damage, 30);
    }
}
