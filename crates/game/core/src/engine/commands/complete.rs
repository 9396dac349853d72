use crate::env::CombatEnv;
use crate::state::{CombatSession, EnemyId, HeroId, PlayerId, QuestId, SessionId, SessionStatus};

use crate::engine::errors::CombatError;
use crate::engine::record::RecordedAction;
use crate::engine::transition::{ActionTransition, ResolutionContext};

/// Claims the rewards of a won encounter. Succeeds once per session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteCombat;

/// Everything a reward provider needs to grant a victory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardClaim {
    pub session: SessionId,
    pub player: PlayerId,
    pub quest: QuestId,
    pub heroes: Vec<HeroId>,
    pub surviving_heroes: Vec<HeroId>,
    pub defeated_enemies: Vec<EnemyId>,
    pub turns: u32,
    /// Percent; 100 when no weakness applied.
    pub drop_multiplier_pct: u32,
    pub experience_multiplier_pct: u32,
}

impl RewardClaim {
    /// Builds the claim for a victorious session. Multipliers take the best
    /// weakness exploited against any defeated enemy by the surviving party.
    pub fn from_session(session: &CombatSession) -> Self {
        let party = session.party_classes();
        let exploited = || {
            session
                .weaknesses
                .iter()
                .filter(|active| session.defeated_enemies.contains(&active.weakness.enemy))
                .filter(|active| active.combo.is_satisfied_by(party))
                .map(|active| active.weakness)
        };
        let drop_multiplier_pct = exploited()
            .map(|weakness| weakness.drop_multiplier_pct)
            .max()
            .unwrap_or(100);
        let experience_multiplier_pct = exploited()
            .map(|weakness| weakness.experience_multiplier_pct)
            .max()
            .unwrap_or(100);

        Self {
            session: session.id,
            player: session.player,
            quest: session.quest,
            heroes: session.hero_ids(),
            surviving_heroes: session.living_heroes().map(|hero| hero.id).collect(),
            defeated_enemies: session.defeated_enemies.clone(),
            turns: session.turn_number,
            drop_multiplier_pct,
            experience_multiplier_pct,
        }
    }
}

impl ActionTransition for CompleteCombat {
    type Output = RewardClaim;

    fn pre_validate(
        &self,
        session: &CombatSession,
        _env: &CombatEnv<'_>,
        _ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        if session.rewards_claimed {
            return Err(CombatError::RewardsAlreadyClaimed);
        }
        if session.status != SessionStatus::Victory {
            return Err(CombatError::NotVictorious(session.status));
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut CombatSession,
        _env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError> {
        let claim = RewardClaim::from_session(session);
        session.rewards_claimed = true;
        session.archived = true;
        session.timestamps.archived_at = Some(ctx.now);

        let record = ctx.record(session, RecordedAction::Complete);
        ctx.push_record(session, record);
        Ok(claim)
    }
}
