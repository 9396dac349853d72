//! Morale: a clamped 0-100 score per combatant and the tier derived from it.

use crate::config::GameConfig;

/// Discrete morale tier. Always derived from the score, never stored.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MoraleLevel {
    Desperate,
    Low,
    Normal,
    High,
    Inspired,
}

/// Percentages a morale tier contributes to damage, defense, and critical chance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoraleModifiers {
    pub damage_pct: i32,
    pub defense_pct: i32,
    pub crit_pct: i32,
}

impl MoraleLevel {
    pub const fn from_score(score: u8) -> Self {
        match score {
            0..=10 => Self::Desperate,
            11..=30 => Self::Low,
            31..=70 => Self::Normal,
            71..=90 => Self::High,
            _ => Self::Inspired,
        }
    }

    pub const fn modifiers(self) -> MoraleModifiers {
        let (damage_pct, defense_pct, crit_pct) = match self {
            Self::Desperate => (-20, -15, 0),
            Self::Low => (-10, -5, 2),
            Self::Normal => (0, 0, 5),
            Self::High => (10, 5, 10),
            Self::Inspired => (20, 10, 15),
        };
        MoraleModifiers {
            damage_pct,
            defense_pct,
            crit_pct,
        }
    }
}

/// Combat events that move morale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MoraleEvent {
    CriticalHit,
    SuccessfulAttack,
    DamageTaken,
    Death,
    Victory,
    SpecialAbilityUsed,
    StatusAfflicted,
    EnvironmentalDamage,
}

impl MoraleEvent {
    pub const fn delta(self) -> i32 {
        match self {
            Self::CriticalHit => 15,
            Self::SuccessfulAttack => 5,
            Self::DamageTaken => -10,
            Self::Death => -30,
            Self::Victory => 25,
            Self::SpecialAbilityUsed => 10,
            Self::StatusAfflicted => -5,
            Self::EnvironmentalDamage => -8,
        }
    }
}

/// Morale of one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoraleState {
    score: u8,
}

impl MoraleState {
    pub fn new(score: u8) -> Self {
        Self {
            score: score.min(GameConfig::MORALE_MAX),
        }
    }

    #[inline]
    pub const fn score(&self) -> u8 {
        self.score
    }

    #[inline]
    pub const fn level(&self) -> MoraleLevel {
        MoraleLevel::from_score(self.score)
    }

    #[inline]
    pub const fn modifiers(&self) -> MoraleModifiers {
        self.level().modifiers()
    }

    /// Applies an event's delta and returns the new level.
    pub fn apply(&mut self, event: MoraleEvent) -> MoraleLevel {
        let next = (i32::from(self.score) + event.delta()).clamp(
            i32::from(GameConfig::MORALE_MIN),
            i32::from(GameConfig::MORALE_MAX),
        );
        self.score = next as u8;
        self.level()
    }
}

impl Default for MoraleState {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_MORALE_BASELINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [MoraleEvent; 8] = [
        MoraleEvent::CriticalHit,
        MoraleEvent::SuccessfulAttack,
        MoraleEvent::DamageTaken,
        MoraleEvent::Death,
        MoraleEvent::Victory,
        MoraleEvent::SpecialAbilityUsed,
        MoraleEvent::StatusAfflicted,
        MoraleEvent::EnvironmentalDamage,
    ];

    #[test]
    fn bands_match_thresholds() {
        assert_eq!(MoraleLevel::from_score(0), MoraleLevel::Desperate);
        assert_eq!(MoraleLevel::from_score(10), MoraleLevel::Desperate);
        assert_eq!(MoraleLevel::from_score(11), MoraleLevel::Low);
        assert_eq!(MoraleLevel::from_score(30), MoraleLevel::Low);
        assert_eq!(MoraleLevel::from_score(70), MoraleLevel::Normal);
        assert_eq!(MoraleLevel::from_score(90), MoraleLevel::High);
        assert_eq!(MoraleLevel::from_score(91), MoraleLevel::Inspired);
        assert_eq!(MoraleLevel::from_score(100), MoraleLevel::Inspired);
    }

    #[test]
    fn score_stays_clamped_under_any_event_sequence() {
        let mut morale = MoraleState::default();
        for step in 0..400usize {
            let event = EVENTS[(step * 7 + step / 5) % EVENTS.len()];
            let level = morale.apply(event);
            assert!(morale.score() <= 100);
            assert_eq!(level, MoraleLevel::from_score(morale.score()));
        }
    }

    #[test]
    fn deltas_saturate_at_bounds() {
        let mut morale = MoraleState::new(95);
        morale.apply(MoraleEvent::Victory);
        assert_eq!(morale.score(), 100);

        let mut morale = MoraleState::new(20);
        morale.apply(MoraleEvent::Death);
        assert_eq!(morale.score(), 0);
        assert_eq!(morale.level(), MoraleLevel::Desperate);
    }

    #[test]
    fn baseline_is_normal() {
        let morale = MoraleState::default();
        assert_eq!(morale.score(), 50);
        assert_eq!(morale.modifiers().crit_pct, 5);
    }
}
