//! Resolution subsystems: dice, damage, status effects, morale, combo streaks,
//! and boss phases.
//!
//! Everything here is pure with respect to I/O. Randomness enters only through
//! an [`RngOracle`](crate::env::RngOracle) passed in by the caller.

pub mod boss;
pub mod combo;
pub mod damage;
pub mod dice;
pub mod morale;
pub mod status;

pub use boss::{BossPhase, BossProfile, BossState, PhaseOverrides, PhaseTransition};
pub use combo::{ActionLabel, ComboState, combo_multiplier};
pub use damage::{
    DamageBreakdown, DamageInput, DamageModifiers, apply_damage, apply_healing, calculate_damage,
    critical_chance, effective_defense, is_critical, scaled_healing,
};
pub use dice::{DiceOutcome, DiceType, clamp_required_roll, resolve_roll, roll_dice};
pub use morale::{MoraleEvent, MoraleLevel, MoraleModifiers, MoraleState};
pub use status::{
    EffectProfile, EffectType, Periodic, StatusEffectState, StatusEffects, StatusModifiers,
    StatusTick, StatusTickKind,
};
