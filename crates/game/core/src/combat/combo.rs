//! Consecutive success/failure streaks and the damage multiplier they unlock.

/// Kind of the last resolved hero action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionLabel {
    RollDice,
    SpecialAbility,
}

/// `min(cap, 1 + floor(successes / 3))`
pub const fn combo_multiplier(consecutive_successes: u32, cap: u32) -> u32 {
    let raw = 1 + consecutive_successes / 3;
    if raw < cap { raw } else { cap }
}

/// Session-wide combo streak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboState {
    pub consecutive_successes: u32,
    pub consecutive_failures: u32,
    /// Multiplier the next hero action will use.
    pub multiplier: u32,
    pub last_action: Option<ActionLabel>,
}

impl ComboState {
    pub const fn new() -> Self {
        Self {
            consecutive_successes: 0,
            consecutive_failures: 0,
            multiplier: 1,
            last_action: None,
        }
    }

    pub fn record_success(&mut self, action: ActionLabel, cap: u32) {
        self.consecutive_successes = self.consecutive_successes.saturating_add(1);
        self.consecutive_failures = 0;
        self.multiplier = combo_multiplier(self.consecutive_successes, cap.max(1));
        self.last_action = Some(action);
    }

    pub fn record_failure(&mut self, action: ActionLabel) {
        self.consecutive_successes = 0;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.multiplier = 1;
        self.last_action = Some(action);
    }
}

impl Default for ComboState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_follows_floor_formula_with_cap() {
        let mut combo = ComboState::new();
        for n in 1..=20u32 {
            combo.record_success(ActionLabel::RollDice, 3);
            assert_eq!(combo.multiplier, (1 + n / 3).min(3));
        }
    }

    #[test]
    fn three_successes_then_failure() {
        let mut combo = ComboState::new();
        for _ in 0..3 {
            combo.record_success(ActionLabel::RollDice, 3);
        }
        assert_eq!(combo.multiplier, 2);

        combo.record_failure(ActionLabel::RollDice);
        assert_eq!(combo.multiplier, 1);
        assert_eq!(combo.consecutive_successes, 0);
        assert_eq!(combo.consecutive_failures, 1);
        assert_eq!(combo.last_action, Some(ActionLabel::RollDice));
    }
}
