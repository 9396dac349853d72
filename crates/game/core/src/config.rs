/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Upper bound for the combo damage multiplier.
    pub combo_cap: u32,

    /// Maximum stacked intensity of a single status effect.
    pub status_intensity_cap: u8,

    /// Morale score every combatant starts an encounter with.
    pub morale_baseline: u8,

    /// Multiplier applied to the pre-defense damage term on a critical hit.
    pub critical_multiplier: u32,

    /// Largest party a player may commit to one encounter.
    pub max_party_size: usize,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of distinct status effects tracked per combatant.
    pub const MAX_STATUS_EFFECTS: usize = 10;

    /// Morale score bounds.
    pub const MORALE_MIN: u8 = 0;
    pub const MORALE_MAX: u8 = 100;

    /// Legal intensity range for status effects and environmental conditions.
    pub const MIN_INTENSITY: u8 = 1;
    pub const MAX_INTENSITY: u8 = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COMBO_CAP: u32 = 3;
    pub const DEFAULT_MORALE_BASELINE: u8 = 50;
    pub const DEFAULT_CRITICAL_MULTIPLIER: u32 = 2;
    pub const DEFAULT_MAX_PARTY_SIZE: usize = 6;

    pub fn new() -> Self {
        Self {
            combo_cap: Self::DEFAULT_COMBO_CAP,
            status_intensity_cap: Self::MAX_INTENSITY,
            morale_baseline: Self::DEFAULT_MORALE_BASELINE,
            critical_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
            max_party_size: Self::DEFAULT_MAX_PARTY_SIZE,
        }
    }

    /// Returns a copy with every tunable pulled back into its legal range.
    ///
    /// Loaded configuration files are normalized through this before use so the
    /// engine never sees a zero combo cap or an intensity cap above the maximum.
    pub fn normalized(mut self) -> Self {
        self.combo_cap = self.combo_cap.max(1);
        self.status_intensity_cap = self
            .status_intensity_cap
            .clamp(Self::MIN_INTENSITY, Self::MAX_INTENSITY);
        self.morale_baseline = self.morale_baseline.min(Self::MORALE_MAX);
        self.critical_multiplier = self.critical_multiplier.max(1);
        self.max_party_size = self.max_party_size.max(1);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_pulls_values_into_range() {
        let config = GameConfig {
            combo_cap: 0,
            status_intensity_cap: 9,
            morale_baseline: 250,
            critical_multiplier: 0,
            max_party_size: 0,
        }
        .normalized();

        assert_eq!(config.combo_cap, 1);
        assert_eq!(config.status_intensity_cap, GameConfig::MAX_INTENSITY);
        assert_eq!(config.morale_baseline, GameConfig::MORALE_MAX);
        assert_eq!(config.critical_multiplier, 1);
        assert_eq!(config.max_party_size, 1);
    }
}
