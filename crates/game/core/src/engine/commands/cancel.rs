use crate::env::CombatEnv;
use crate::state::{CombatSession, SessionStatus};

use crate::engine::errors::CombatError;
use crate::engine::record::RecordedAction;
use crate::engine::resolve::conclude;
use crate::engine::transition::{ActionTransition, ResolutionContext};

/// Aborts a session that has not ended yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CancelCombat;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CancelOutcome {
    /// Status the session was in when cancelled.
    pub previous: SessionStatus,
    pub message: String,
}

impl ActionTransition for CancelCombat {
    type Output = CancelOutcome;

    fn pre_validate(
        &self,
        session: &CombatSession,
        _env: &CombatEnv<'_>,
        _ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        if session.is_terminal() {
            return Err(CombatError::AlreadyTerminal(session.status));
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut CombatSession,
        _env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError> {
        let previous = session.status;
        conclude(session, ctx, SessionStatus::Cancelled);

        let record = ctx.record(session, RecordedAction::Cancel);
        ctx.push_record(session, record);
        Ok(CancelOutcome {
            previous,
            message: format!("combat cancelled while {previous}"),
        })
    }
}
