//! Damage calculation and application.

/// Percentage modifiers feeding one damage calculation.
///
/// All categories are additive with each other; their sum is applied once,
/// multiplicatively, to the base term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageModifiers {
    pub morale_pct: i32,
    pub status_pct: i32,
    pub environment_pct: i32,
    /// Boss-weakness damage bonus while the matching combo holds.
    pub weakness_pct: i32,
}

impl DamageModifiers {
    pub const fn total_pct(&self) -> i32 {
        self.morale_pct + self.status_pct + self.environment_pct + self.weakness_pct
    }
}

/// Inputs for one damage calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageInput {
    pub base_attack: u32,
    pub combo_multiplier: u32,
    pub modifiers: DamageModifiers,
    pub target_defense: u32,
    pub critical: bool,
}

/// Itemized result, kept for the combat log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBreakdown {
    /// Damage before defense (after combo, percentages and critical).
    pub pre_defense: u32,
    pub defense: u32,
    pub final_damage: u32,
    pub critical: bool,
}

/// Calculate damage from an attack.
///
/// # Formula
///
/// ```text
/// factor      = max(0, 100 + morale% + status% + environment% + weakness%)
/// pre_defense = round_half_up(base × combo × (crit ? crit_multiplier : 1) × factor / 100)
/// final       = max(0, pre_defense − defense)
/// ```
pub fn calculate_damage(input: &DamageInput, critical_multiplier: u32) -> DamageBreakdown {
    let factor = (100 + i64::from(input.modifiers.total_pct())).max(0) as u64;
    let critical = if input.critical {
        u64::from(critical_multiplier.max(1))
    } else {
        1
    };
    let scaled = u64::from(input.base_attack)
        * u64::from(input.combo_multiplier.max(1))
        * factor
        * critical;
    let pre_defense = ((scaled + 50) / 100).min(u64::from(u32::MAX)) as u32;

    DamageBreakdown {
        pre_defense,
        defense: input.target_defense,
        final_damage: pre_defense.saturating_sub(input.target_defense),
        critical: input.critical,
    }
}

/// Defense after percentage modifiers, floored at zero.
pub fn effective_defense(base_defense: u32, defense_pct: i32) -> u32 {
    let factor = (100 + i64::from(defense_pct)).max(0) as u64;
    (u64::from(base_defense) * factor / 100).min(u64::from(u32::MAX)) as u32
}

/// Healing after the environmental healing modifier, floored at zero.
pub fn scaled_healing(amount: u32, healing_pct: i32) -> u32 {
    effective_defense(amount, healing_pct)
}

/// Critical chance in percent, clamped to `[0, 100]`.
pub fn critical_chance(morale_pct: i32, status_pct: i32) -> u32 {
    (morale_pct + status_pct).clamp(0, 100) as u32
}

/// A d100 roll lands a critical when it does not exceed the chance.
pub const fn is_critical(chance: u32, d100: u32) -> bool {
    d100 <= chance
}

/// Apply damage to current HP (clamped to 0).
pub const fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Apply healing to current HP (clamped to `max_hp`).
pub fn apply_healing(current_hp: u32, amount: u32, max_hp: u32) -> u32 {
    current_hp.saturating_add(amount).min(max_hp)
}
