//! Cloneable façade for issuing combat commands to the runtime.
//!
//! [`CombatHandle`] hides the worker plumbing: every command is routed to the
//! session's own worker and the handle waits for the persisted result.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::broadcast;
use tracing::{info, warn};

use game_core::engine::{
    AbilityOutcome, CancelOutcome, EnemyAttackOutcome, RollOutcome, StartOutcome, StatusOutcome,
};
use game_core::{
    ActionOutcome, ApplyStatusEffect, CancelCombat, CombatCommand, CombatSession,
    CombatSessionSnapshot, Combatant, CompleteCombat, DiceType, EffectType, EnemyAttack, HeroId, PlayerId,
    QuestId, RollDice, SessionId, StartCombat, UseSpecialAbility,
};

use super::errors::{Result, RuntimeError};
use super::types::{ActionResponse, CombatOutcome, CompletionOutcome};
use crate::events::{Event, Topic};
use crate::repository::CombatLogEntry;
use crate::workers::{Resolution, WorkerPool, timestamp_ms};

struct HandleInner {
    pool: WorkerPool,
    next_session: AtomicU64,
}

/// Client-facing handle to the combat runtime.
#[derive(Clone)]
pub struct CombatHandle {
    inner: Arc<HandleInner>,
}

impl CombatHandle {
    pub(crate) fn new(pool: WorkerPool, next_session: SessionId) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                pool,
                next_session: AtomicU64::new(next_session.0),
            }),
        }
    }

    pub(crate) fn pool(&self) -> &WorkerPool {
        &self.inner.pool
    }

    /// Creates a session for `player` on `quest` and starts it with `heroes`.
    ///
    /// A rejected start leaves no session behind.
    pub async fn start_combat(
        &self,
        player: PlayerId,
        quest: QuestId,
        heroes: Vec<HeroId>,
    ) -> Result<ActionResponse<StartOutcome>> {
        let ctx = self.inner.pool.context();
        let id = SessionId(self.inner.next_session.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        let seed = ctx.config.rng_seed.unwrap_or_else(|| derive_seed(id, now));

        let session = CombatSession::prepare(id, player, quest, seed, timestamp_ms(now));
        ctx.sessions.save(&session)?;
        info!(target: "runtime::session", session = %id, %player, %quest, "session created");

        match self.inner.pool.dispatch(id, StartCombat::new(heroes).into()).await {
            Ok(resolution) => respond(resolution, "start_combat", |outcome| match outcome {
                ActionOutcome::Started(started) => Some(started),
                _ => None,
            }),
            Err(error) => {
                self.inner.pool.discard(id).await;
                if let Err(cleanup) = ctx.sessions.delete(id) {
                    warn!(target: "runtime::session", session = %id, "failed to drop rejected session: {cleanup}");
                }
                Err(error)
            }
        }
    }

    pub async fn roll_dice(
        &self,
        session: SessionId,
        dice: DiceType,
    ) -> Result<ActionResponse<RollOutcome>> {
        let resolution = self.dispatch(session, RollDice { dice }.into()).await?;
        respond(resolution, "roll_dice", |outcome| match outcome {
            ActionOutcome::Rolled(rolled) => Some(rolled),
            _ => None,
        })
    }

    pub async fn enemy_attack(
        &self,
        session: SessionId,
    ) -> Result<ActionResponse<EnemyAttackOutcome>> {
        let resolution = self.dispatch(session, EnemyAttack.into()).await?;
        respond(resolution, "enemy_attack", |outcome| match outcome {
            ActionOutcome::EnemyAttacked(attack) => Some(attack),
            _ => None,
        })
    }

    pub async fn use_special_ability(
        &self,
        session: SessionId,
        hero: HeroId,
    ) -> Result<ActionResponse<AbilityOutcome>> {
        let resolution = self
            .dispatch(session, UseSpecialAbility { hero }.into())
            .await?;
        respond(resolution, "use_special_ability", |outcome| match outcome {
            ActionOutcome::AbilityUsed(ability) => Some(ability),
            _ => None,
        })
    }

    /// Applies `effect` to a hero or the active enemy.
    ///
    /// An immune target yields `success = false` and leaves the session as it
    /// was.
    pub async fn apply_status_effect(
        &self,
        session: SessionId,
        target: Combatant,
        effect: EffectType,
        duration: u32,
        intensity: u8,
    ) -> Result<ActionResponse<StatusOutcome>> {
        let command = ApplyStatusEffect {
            target,
            effect,
            duration,
            intensity,
        };
        let resolution = self.dispatch(session, command.into()).await?;
        respond(resolution, "apply_status_effect", |outcome| match outcome {
            ActionOutcome::StatusApplied(status) => Some(status),
            _ => None,
        })
    }

    /// Claims the rewards of a won session. Succeeds at most once.
    pub async fn complete_combat(&self, session: SessionId) -> Result<CompletionOutcome> {
        let resolution = self.dispatch(session, CompleteCombat.into()).await?;
        let Resolution {
            outcome,
            grant,
            session,
        } = resolution;

        let (ActionOutcome::Completed(claim), Some(grant)) = (outcome, grant) else {
            return Err(RuntimeError::UnexpectedOutcome("complete_combat"));
        };
        let status = CombatOutcome::from_status(session.status)
            .ok_or(RuntimeError::UnexpectedOutcome("complete_combat"))?;

        let message = format!(
            "victory in {} turns: {} gold, {} experience per hero",
            claim.turns, grant.gold, grant.experience
        );
        Ok(CompletionOutcome {
            status,
            gold_earned: grant.gold,
            experience_earned: grant.experience,
            hero_new_level: grant.level_ups.iter().map(|(_, level)| *level).max(),
            level_ups: grant.level_ups,
            dropped_items: grant.items,
            message,
            session,
        })
    }

    pub async fn cancel_combat(&self, session: SessionId) -> Result<ActionResponse<CancelOutcome>> {
        let resolution = self.dispatch(session, CancelCombat.into()).await?;
        respond(resolution, "cancel_combat", |outcome| match outcome {
            ActionOutcome::Cancelled(cancelled) => Some(cancelled),
            _ => None,
        })
    }

    /// Latest persisted snapshot of `session`.
    pub fn session(&self, session: SessionId) -> Result<CombatSessionSnapshot> {
        self.inner
            .pool
            .context()
            .sessions
            .load(session)?
            .ok_or(RuntimeError::SessionNotFound(session))
    }

    /// Ordered combat log of `session`.
    pub fn combat_log(&self, session: SessionId) -> Result<Vec<CombatLogEntry>> {
        let ctx = self.inner.pool.context();
        if !ctx.sessions.exists(session) {
            return Err(RuntimeError::SessionNotFound(session));
        }
        Ok(ctx.log.read(session)?)
    }

    pub fn list_sessions(&self) -> Result<Vec<SessionId>> {
        Ok(self.inner.pool.context().sessions.list_ids()?)
    }

    /// Number of live session workers. Settled sessions release theirs.
    pub async fn active_workers(&self) -> usize {
        self.inner.pool.len().await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - resolved and rejected actions
    /// - `Topic::Outcome` - concluded sessions and claimed rewards
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut outcomes = handle.subscribe(Topic::Outcome);
    /// while let Ok(event) = outcomes.recv().await {
    ///     println!("{}", event.to_json()?);
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.inner.pool.context().event_bus.subscribe(topic)
    }

    async fn dispatch(&self, session: SessionId, command: CombatCommand) -> Result<Resolution> {
        if !self.inner.pool.context().sessions.exists(session) {
            return Err(RuntimeError::SessionNotFound(session));
        }
        self.inner.pool.dispatch(session, command).await
    }
}

fn respond<T>(
    resolution: Resolution,
    command: &'static str,
    pick: impl FnOnce(ActionOutcome) -> Option<T>,
) -> Result<ActionResponse<T>> {
    let outcome = pick(resolution.outcome).ok_or(RuntimeError::UnexpectedOutcome(command))?;
    Ok(ActionResponse {
        outcome,
        session: resolution.session,
    })
}

/// Seed for sessions started without a fixed RNG seed.
fn derive_seed(id: SessionId, at: DateTime<Utc>) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(id.0.to_le_bytes());
    hasher.update(at.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    let digest = hasher.finalize();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn derived_seed_depends_on_session_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap();

        assert_eq!(derive_seed(SessionId(1), at), derive_seed(SessionId(1), at));
        assert_ne!(derive_seed(SessionId(1), at), derive_seed(SessionId(2), at));
        assert_ne!(derive_seed(SessionId(1), at), derive_seed(SessionId(1), later));
    }
}
