//! The three-phase command pipeline.

use crate::config::GameConfig;
use crate::env::CombatEnv;
use crate::state::CombatSession;

use super::errors::{CombatError, TransitionPhase, TransitionPhaseError};
use super::record::{CombatEvent, RecordedAction, TurnRecord};

/// Everything a command needs besides the session and oracles, plus the
/// records and events it produces.
pub struct ResolutionContext<'a> {
    pub config: &'a GameConfig,
    /// Caller-supplied clock (unix milliseconds).
    pub now: u64,
    pub records: Vec<TurnRecord>,
    pub events: Vec<CombatEvent>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(config: &'a GameConfig, now: u64) -> Self {
        Self {
            config,
            now,
            records: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Starts a record stamped with the session's current nonce and turn.
    pub fn record(&self, session: &CombatSession, action: RecordedAction) -> TurnRecord {
        TurnRecord::new(session.nonce, session.turn_number, action)
    }

    /// Appends a record and folds it into the session's log digest.
    pub fn push_record(&mut self, session: &mut CombatSession, record: TurnRecord) {
        session.log_digest = record.chain_digest(&session.log_digest);
        self.records.push(record);
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

/// Defines how a command mutates a combat session.
///
/// `pre_validate` must reject every illegal request before `apply` touches the
/// session; `apply` may still fail on oracle faults, in which case the caller
/// discards its working copy.
pub trait ActionTransition {
    type Output;

    /// Validates preconditions using the session **before** mutation.
    fn pre_validate(
        &self,
        _session: &CombatSession,
        _env: &CombatEnv<'_>,
        _ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        Ok(())
    }

    /// Mutates the session. Assumes `pre_validate` succeeded.
    fn apply(
        &self,
        session: &mut CombatSession,
        env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError>;

    /// Validates postconditions using the session **after** mutation.
    fn post_validate(
        &self,
        session: &CombatSession,
        _env: &CombatEnv<'_>,
    ) -> Result<(), CombatError> {
        session
            .check_invariants()
            .map_err(CombatError::InvariantViolated)
    }
}

/// Runs `pre_validate → apply → post_validate`, tagging failures with the phase.
pub(super) fn drive_transition<T>(
    transition: &T,
    session: &mut CombatSession,
    env: &CombatEnv<'_>,
    ctx: &mut ResolutionContext<'_>,
) -> Result<T::Output, TransitionPhaseError<CombatError>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(session, env, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let output = transition
        .apply(session, env, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(session, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(output)
}
