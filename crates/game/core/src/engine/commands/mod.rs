//! Command types accepted by [`CombatEngine`](super::CombatEngine).
//!
//! Each command implements [`ActionTransition`](super::ActionTransition) and
//! carries only the caller's request; everything else is read from the session
//! and the oracles.

mod ability;
mod cancel;
mod complete;
mod enemy;
mod roll;
mod start;
mod status;

pub use ability::{AbilityOutcome, UseSpecialAbility};
pub use cancel::{CancelCombat, CancelOutcome};
pub use complete::{CompleteCombat, RewardClaim};
pub use enemy::{EnemyAttack, EnemyAttackOutcome};
pub use roll::{RollDice, RollOutcome};
pub use start::{StartCombat, StartOutcome};
pub use status::{ApplyStatusEffect, StatusOutcome};

/// Top-level command enum routed by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatCommand {
    Start(StartCombat),
    RollDice(RollDice),
    EnemyAttack(EnemyAttack),
    SpecialAbility(UseSpecialAbility),
    ApplyStatusEffect(ApplyStatusEffect),
    Complete(CompleteCombat),
    Cancel(CancelCombat),
}

impl CombatCommand {
    /// Stable snake_case name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => "start_combat",
            Self::RollDice(_) => "roll_dice",
            Self::EnemyAttack(_) => "enemy_attack",
            Self::SpecialAbility(_) => "use_special_ability",
            Self::ApplyStatusEffect(_) => "apply_status_effect",
            Self::Complete(_) => "complete_combat",
            Self::Cancel(_) => "cancel_combat",
        }
    }
}

impl From<StartCombat> for CombatCommand {
    fn from(command: StartCombat) -> Self {
        Self::Start(command)
    }
}

impl From<RollDice> for CombatCommand {
    fn from(command: RollDice) -> Self {
        Self::RollDice(command)
    }
}

impl From<EnemyAttack> for CombatCommand {
    fn from(command: EnemyAttack) -> Self {
        Self::EnemyAttack(command)
    }
}

impl From<UseSpecialAbility> for CombatCommand {
    fn from(command: UseSpecialAbility) -> Self {
        Self::SpecialAbility(command)
    }
}

impl From<ApplyStatusEffect> for CombatCommand {
    fn from(command: ApplyStatusEffect) -> Self {
        Self::ApplyStatusEffect(command)
    }
}

impl From<CompleteCombat> for CombatCommand {
    fn from(command: CompleteCombat) -> Self {
        Self::Complete(command)
    }
}

impl From<CancelCombat> for CombatCommand {
    fn from(command: CancelCombat) -> Self {
        Self::Cancel(command)
    }
}
