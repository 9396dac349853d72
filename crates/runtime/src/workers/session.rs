//! Session worker that owns all writes to one [`CombatSession`].
//!
//! For each command it reads the session from the repository, executes the
//! command through [`CombatEngine`], then appends the combat log and saves the
//! session once. A failed save truncates the log back, so a rejected command
//! leaves neither a session change nor log entries behind.
//!
//! `CompleteCombat` records the claim before asking the reward provider, so a
//! lost save can never lead to a second grant. When the provider fails, the
//! previous session and log are put back and the claim can be retried.
//!
//! Once a session settles the worker closes its queue, drains what is left,
//! and releases the session's log handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use game_core::{
    ActionOutcome, CombatCommand, CombatEngine, CombatSession, ErrorKind, ExecutionOutcome,
    GameError, RewardClaim, SessionId, TurnRecord,
};

use super::WorkerContext;
use crate::api::{Result, RewardGrant, RuntimeError};
use crate::events::{Event, OutcomeEvent, SessionEvent};
use crate::repository::{CombatLogEntry, RepositoryError};

/// A command queued for one session.
pub(crate) struct Command {
    pub command: CombatCommand,
    pub reply: oneshot::Sender<Result<Resolution>>,
}

/// What the worker hands back for a resolved command.
pub(crate) struct Resolution {
    pub outcome: ActionOutcome,
    /// Present only for `CompleteCombat`.
    pub grant: Option<RewardGrant>,
    pub session: CombatSession,
}

pub(crate) fn timestamp_ms(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp_millis()).unwrap_or_default()
}

pub(crate) struct SessionWorker {
    id: SessionId,
    ctx: Arc<WorkerContext>,
    command_rx: mpsc::Receiver<Command>,
    /// Set once the stored session can no longer change.
    settled: bool,
}

impl SessionWorker {
    pub fn new(id: SessionId, ctx: Arc<WorkerContext>, command_rx: mpsc::Receiver<Command>) -> Self {
        Self {
            id,
            ctx,
            command_rx,
            settled: false,
        }
    }

    /// Processes commands until every sender is dropped or the session settles.
    pub async fn run(mut self) {
        debug!(target: "runtime::worker", session = %self.id, "session worker started");
        while let Some(Command { command, reply }) = self.command_rx.recv().await {
            let result = self.execute(command).await;
            // Closed before replying so the pool sees it when the caller resumes.
            if self.settled {
                self.command_rx.close();
            }
            if reply.send(result).is_err() {
                debug!(target: "runtime::worker", session = %self.id, "reply channel closed (caller dropped)");
            }
        }
        if self.settled {
            if let Err(error) = self.ctx.log.close(self.id) {
                warn!(target: "runtime::worker", session = %self.id, "failed to close combat log: {error}");
            }
        }
        debug!(target: "runtime::worker", session = %self.id, "session worker stopped");
    }

    async fn execute(&mut self, command: CombatCommand) -> Result<Resolution> {
        let name = command.name();
        let before = self
            .ctx
            .sessions
            .load(self.id)?
            .ok_or(RuntimeError::SessionNotFound(self.id))?;
        self.settled = before.is_settled();
        let mut session = before.clone();
        let now = Utc::now();

        let executed = {
            let env = self.ctx.oracles.as_combat_env();
            CombatEngine::new(&mut session, &self.ctx.config.game).execute(
                env,
                &command,
                timestamp_ms(now),
            )
        };
        let execution = match executed {
            Ok(execution) => execution,
            Err(error) => {
                debug!(
                    target: "runtime::session",
                    session = %self.id,
                    command = name,
                    phase = error.phase().as_str(),
                    code = error.error_code(),
                    "command rejected: {}",
                    error.combat_error()
                );
                self.reject(name, error.kind(), &error);
                return Err(error.into());
            }
        };

        let mut log_len = None;
        if execution.outcome.mutated() {
            match self.persist(&before, &session, &execution.records, now) {
                Ok(len) => log_len = Some(len),
                Err(error) => {
                    warn!(target: "runtime::session", session = %self.id, command = name, "failed to persist: {error}");
                    self.reject(name, error.kind(), &error);
                    return Err(error);
                }
            }
        }

        let grant = match (&execution.outcome, log_len) {
            (ActionOutcome::Completed(claim), Some(log_len)) => {
                match self.claim_rewards(claim).await {
                    Ok(grant) => Some(grant),
                    Err(error) => {
                        self.restore(&before, log_len);
                        self.reject(name, error.kind(), &error);
                        return Err(error);
                    }
                }
            }
            _ => None,
        };
        self.settled = session.is_settled();

        info!(
            target: "runtime::session",
            session = %self.id,
            command = name,
            nonce = session.nonce,
            status = %session.status,
            "{}",
            execution.outcome.message()
        );
        self.publish(&before, &session, name, &execution, grant.as_ref());

        Ok(Resolution {
            outcome: execution.outcome,
            grant,
            session,
        })
    }

    async fn claim_rewards(&self, claim: &RewardClaim) -> Result<RewardGrant> {
        let timeout = self.ctx.config.provider_timeout;
        match tokio::time::timeout(timeout, self.ctx.rewards.grant(claim)).await {
            Ok(Ok(grant)) => Ok(grant),
            Ok(Err(error)) => {
                warn!(target: "runtime::rewards", session = %self.id, "reward provider failed: {error}");
                Err(error.into())
            }
            Err(_) => {
                warn!(target: "runtime::rewards", session = %self.id, ?timeout, "reward provider timed out");
                Err(RuntimeError::ProviderTimeout(timeout))
            }
        }
    }

    /// Appends the command's records, then saves the session. Returns the log
    /// length from before the append.
    fn persist(
        &self,
        before: &CombatSession,
        after: &CombatSession,
        records: &[TurnRecord],
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let first = self.ctx.log.len(self.id)?;
        let (entries, digest) =
            CombatLogEntry::chain(self.id, first, before.log_digest, records, now);
        if digest != after.log_digest {
            return Err(RepositoryError::CorruptedData(format!(
                "log digest of {} diverged at nonce {}",
                self.id, after.nonce
            ))
            .into());
        }

        self.ctx.log.append(self.id, &entries)?;
        if let Err(error) = self.ctx.sessions.save(after) {
            self.truncate_log(first);
            return Err(error.into());
        }
        Ok(first)
    }

    /// Puts back the session and log as they were before a claim whose grant
    /// failed.
    fn restore(&self, before: &CombatSession, log_len: u64) {
        match self.ctx.sessions.save(before) {
            Ok(()) => self.truncate_log(log_len),
            Err(error) => warn!(
                target: "runtime::rewards",
                session = %self.id,
                "failed to restore session after reward failure, claim stays recorded: {error}"
            ),
        }
    }

    fn truncate_log(&self, len: u64) {
        if let Err(error) = self.ctx.log.truncate(self.id, len) {
            warn!(target: "runtime::session", session = %self.id, len, "failed to roll back combat log: {error}");
        }
    }

    fn publish(
        &self,
        before: &CombatSession,
        after: &CombatSession,
        name: &str,
        execution: &ExecutionOutcome,
        grant: Option<&RewardGrant>,
    ) {
        let bus = &self.ctx.event_bus;
        bus.publish(Event::Combat(SessionEvent::ActionResolved {
            session: self.id,
            nonce: after.nonce,
            command: name.to_string(),
            message: execution.outcome.message().to_string(),
            events: execution.events.clone(),
        }));

        if !before.is_terminal() && after.is_terminal() {
            info!(
                target: "runtime::session",
                session = %self.id,
                status = %after.status,
                turns = after.turn_number,
                digest = %hex::encode(after.log_digest),
                "session concluded"
            );
            bus.publish(Event::Outcome(OutcomeEvent::SessionConcluded {
                session: self.id,
                player: after.player,
                quest: after.quest,
                status: after.status,
                turns: after.turn_number,
            }));
        }

        if let Some(grant) = grant {
            bus.publish(Event::Outcome(OutcomeEvent::RewardsClaimed {
                session: self.id,
                player: after.player,
                gold: grant.gold,
                experience: grant.experience,
                items: grant.items.clone(),
                level_ups: grant.level_ups.clone(),
            }));
        }
    }

    fn reject(&self, name: &str, kind: ErrorKind, error: &dyn std::fmt::Display) {
        self.ctx
            .event_bus
            .publish(Event::Combat(SessionEvent::ActionRejected {
                session: self.id,
                command: name.to_string(),
                kind,
                error: error.to_string(),
            }));
    }
}
