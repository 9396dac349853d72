//! Combat state machine and action execution pipeline.
//!
//! The [`CombatEngine`] is the authoritative reducer for a [`CombatSession`].
//! Every command runs `pre_validate → apply → post_validate` against a working
//! copy of the session; the copy replaces the session only when all three
//! phases succeed, so a rejected or failed command never leaves partial state.

mod commands;
mod errors;
mod record;
mod resolve;
mod transition;

pub use commands::{
    AbilityOutcome, ApplyStatusEffect, CancelCombat, CancelOutcome, CombatCommand, CompleteCombat,
    EnemyAttack, EnemyAttackOutcome, RewardClaim, RollDice, RollOutcome, StartCombat,
    StartOutcome, StatusOutcome, UseSpecialAbility,
};
pub use errors::{CombatError, ExecuteError, TransitionPhase, TransitionPhaseError};
pub use record::{CombatEvent, RecordedAction, TurnRecord};
pub use transition::{ActionTransition, ResolutionContext};

use crate::config::GameConfig;
use crate::env::CombatEnv;
use crate::state::CombatSession;

use transition::drive_transition;

/// Command-specific result.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    Started(StartOutcome),
    Rolled(RollOutcome),
    EnemyAttacked(EnemyAttackOutcome),
    AbilityUsed(AbilityOutcome),
    StatusApplied(StatusOutcome),
    Completed(RewardClaim),
    Cancelled(CancelOutcome),
}

impl ActionOutcome {
    /// False only for a status application the target was immune to.
    pub fn mutated(&self) -> bool {
        match self {
            Self::StatusApplied(outcome) => outcome.success,
            _ => true,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Started(outcome) => &outcome.message,
            Self::Rolled(outcome) => &outcome.message,
            Self::EnemyAttacked(outcome) => &outcome.message,
            Self::AbilityUsed(outcome) => &outcome.message,
            Self::StatusApplied(outcome) => &outcome.message,
            Self::Completed(_) => "rewards claimed",
            Self::Cancelled(outcome) => &outcome.message,
        }
    }
}

/// Complete outcome of one executed command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    pub outcome: ActionOutcome,
    /// Combat log lines, in the order they happened.
    pub records: Vec<TurnRecord>,
    pub events: Vec<CombatEvent>,
}

/// Engine that executes commands against one session.
pub struct CombatEngine<'a> {
    session: &'a mut CombatSession,
    config: &'a GameConfig,
}

impl<'a> CombatEngine<'a> {
    pub fn new(session: &'a mut CombatSession, config: &'a GameConfig) -> Self {
        Self { session, config }
    }

    pub fn session(&self) -> &CombatSession {
        self.session
    }

    /// Executes a command. `now` is the caller's clock in unix milliseconds.
    ///
    /// On success the session nonce advances, unless the command changed
    /// nothing (an immune status application).
    pub fn execute(
        &mut self,
        env: CombatEnv<'_>,
        command: &CombatCommand,
        now: u64,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let mut working = self.session.clone();
        let mut ctx = ResolutionContext::new(self.config, now);

        let outcome = match command {
            CombatCommand::Start(command) => {
                drive_transition(command, &mut working, &env, &mut ctx)
                    .map(ActionOutcome::Started)
                    .map_err(ExecuteError::Start)?
            }
            CombatCommand::RollDice(command) => {
                drive_transition(command, &mut working, &env, &mut ctx)
                    .map(ActionOutcome::Rolled)
                    .map_err(ExecuteError::RollDice)?
            }
            CombatCommand::EnemyAttack(command) => {
                drive_transition(command, &mut working, &env, &mut ctx)
                    .map(ActionOutcome::EnemyAttacked)
                    .map_err(ExecuteError::EnemyAttack)?
            }
            CombatCommand::SpecialAbility(command) => {
                drive_transition(command, &mut working, &env, &mut ctx)
                    .map(ActionOutcome::AbilityUsed)
                    .map_err(ExecuteError::SpecialAbility)?
            }
            CombatCommand::ApplyStatusEffect(command) => {
                drive_transition(command, &mut working, &env, &mut ctx)
                    .map(ActionOutcome::StatusApplied)
                    .map_err(ExecuteError::StatusEffect)?
            }
            CombatCommand::Complete(command) => {
                drive_transition(command, &mut working, &env, &mut ctx)
                    .map(ActionOutcome::Completed)
                    .map_err(ExecuteError::Complete)?
            }
            CombatCommand::Cancel(command) => {
                drive_transition(command, &mut working, &env, &mut ctx)
                    .map(ActionOutcome::Cancelled)
                    .map_err(ExecuteError::Cancel)?
            }
        };

        if outcome.mutated() {
            working.nonce += 1;
            *self.session = working;
        }

        Ok(ExecutionOutcome {
            outcome,
            records: ctx.records,
            events: ctx.events,
        })
    }
}
