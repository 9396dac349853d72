//! Dice resolution.

use crate::env::RngOracle;

/// Supported die types.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DiceType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DiceType {
    /// Number of faces on this die.
    pub const fn faces(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }

    /// Maps a face count back to a die. Returns `None` for unsupported dice.
    pub const fn from_faces(faces: u32) -> Option<Self> {
        match faces {
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            _ => None,
        }
    }
}

/// Result of one success check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceOutcome {
    pub dice: DiceType,
    pub roll: u32,
    /// Threshold after clamping into `[1, faces]`.
    pub required_roll: u32,
    pub success: bool,
}

/// Clamps an adjusted threshold into `[1, faces]`.
///
/// Modifiers may push the raw threshold arbitrarily far in either direction;
/// the clamp guarantees a natural 1 can never be required to beat less than 1
/// and a max face always remains reachable.
pub fn clamp_required_roll(required: i32, dice: DiceType) -> u32 {
    required.clamp(1, dice.faces() as i32) as u32
}

/// Resolves a drawn value against a threshold. A roll equal to the threshold succeeds.
pub fn resolve_roll(dice: DiceType, required: i32, roll: u32) -> DiceOutcome {
    let required_roll = clamp_required_roll(required, dice);
    DiceOutcome {
        dice,
        roll,
        required_roll,
        success: roll >= required_roll,
    }
}

/// Draws a uniform value in `[1, faces]` and resolves it against `required`.
pub fn roll_dice(
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
    dice: DiceType,
    required: i32,
) -> DiceOutcome {
    let roll = rng.roll_die(seed, dice.faces());
    resolve_roll(dice, required, roll)
}
