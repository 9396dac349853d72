//! Automated party play.
//!
//! The autopilot heals when someone is hurt, strikes with ready abilities, and
//! otherwise rolls a d20. Enemy turns are resolved as soon as they come up.

use std::fmt;

use anyhow::{Result, bail};
use tracing::debug;

use game_core::env::AbilityEffect;
use game_core::{CombatSession, DiceType, HeroId, SessionId, SessionStatus, TurnSide};
use runtime::{CombatHandle, CombatOutcome, CompletionOutcome};

use crate::config::ClientConfig;

/// Heroes below this share of their health get healed first.
const HEAL_BELOW_PCT: u8 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Roll(DiceType),
    Ability(HeroId),
    EnemyAttack,
}

/// Picks the next command for `session`, or `None` once it has ended.
pub fn next_move(session: &CombatSession) -> Option<Move> {
    if session.status != SessionStatus::InProgress {
        return None;
    }
    if session.turn == TurnSide::Enemy {
        return Some(Move::EnemyAttack);
    }

    let mut ready = session
        .living_heroes()
        .filter(|hero| hero.cooldown == 0);
    let wounded = session
        .living_heroes()
        .any(|hero| hero.health.is_below_percent(HEAL_BELOW_PCT));

    let pick = ready.find(|hero| match hero.ability.effect {
        AbilityEffect::Heal { .. } | AbilityEffect::PartyHeal { .. } => wounded,
        AbilityEffect::Strike { .. } => true,
    });
    Some(pick.map_or(Move::Roll(DiceType::D20), |hero| Move::Ability(hero.id)))
}

/// How one automated encounter went.
#[derive(Clone, Debug)]
pub struct EncounterReport {
    pub session: SessionId,
    pub outcome: CombatOutcome,
    pub turns: u32,
    pub actions: usize,
    /// Present after a victory.
    pub rewards: Option<CompletionOutcome>,
}

impl fmt::Display for EncounterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} after {} turns ({} actions)",
            self.session, self.outcome, self.turns, self.actions
        )?;
        if let Some(rewards) = &self.rewards {
            write!(f, "\n  {}", rewards.message)?;
            if !rewards.dropped_items.is_empty() {
                let items: Vec<String> = rewards.dropped_items.iter().map(|id| id.to_string()).collect();
                write!(f, "\n  dropped: {}", items.join(", "))?;
            }
            for (hero, level) in &rewards.level_ups {
                write!(f, "\n  {hero} reached level {level}")?;
            }
        }
        Ok(())
    }
}

/// Starts the configured encounter, plays it to the end, and claims the
/// rewards of a victory.
pub async fn run_encounter(handle: &CombatHandle, config: &ClientConfig) -> Result<EncounterReport> {
    let started = handle
        .start_combat(config.player, config.quest, config.heroes.clone())
        .await?;
    println!("{}", started.outcome.message);

    let id = started.session.id;
    let mut session = started.session;
    let mut actions = 0;

    while let Some(next) = next_move(&session) {
        if actions >= config.max_actions {
            bail!("{id} still running after {actions} actions");
        }
        debug!(session = %id, ?next, "autopilot move");
        let message = match next {
            Move::Roll(dice) => {
                let response = handle.roll_dice(id, dice).await?;
                session = response.session;
                response.outcome.message
            }
            Move::Ability(hero) => {
                let response = handle.use_special_ability(id, hero).await?;
                session = response.session;
                response.outcome.message
            }
            Move::EnemyAttack => {
                let response = handle.enemy_attack(id).await?;
                session = response.session;
                response.outcome.message
            }
        };
        println!("  {message}");
        actions += 1;
    }

    let Some(outcome) = CombatOutcome::from_status(session.status) else {
        bail!("{id} stopped while {}", session.status);
    };
    let rewards = match outcome {
        CombatOutcome::Victory => Some(handle.complete_combat(id).await?),
        CombatOutcome::Fled | CombatOutcome::Defeated => None,
    };

    Ok(EncounterReport {
        session: id,
        outcome,
        turns: session.turn_number,
        actions,
        rewards,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use game_content::ContentFactory;
    use game_core::RngOracle;
    use runtime::{CombatRuntime, OracleManager, RuntimeConfig};

    use super::*;

    struct HighRolls;

    impl RngOracle for HighRolls {
        fn next_u32(&self, _seed: u64) -> u32 {
            u32::MAX
        }

        fn roll_d100(&self, _seed: u64) -> u32 {
            100
        }

        fn roll_die(&self, _seed: u64, sides: u32) -> u32 {
            sides
        }
    }

    async fn handle() -> (CombatRuntime, CombatHandle) {
        let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let catalog = ContentFactory::new(data_dir).load_catalog().unwrap();
        let runtime = CombatRuntime::builder()
            .config(RuntimeConfig::default())
            .oracles(OracleManager::new(Arc::new(catalog)).with_rng(Arc::new(HighRolls)))
            .build()
            .await
            .unwrap();
        let handle = runtime.handle();
        (runtime, handle)
    }

    #[tokio::test]
    async fn opens_with_a_ready_strike_then_rolls() {
        let (_runtime, handle) = handle().await;
        let mut session = handle
            .start_combat(game_core::PlayerId(1), game_core::QuestId(1), vec![HeroId(1), HeroId(2)])
            .await
            .unwrap()
            .session;

        assert_eq!(next_move(&session), Some(Move::Ability(HeroId(1))));

        session.heroes[0].cooldown = 2;
        assert_eq!(next_move(&session), Some(Move::Roll(DiceType::D20)));

        session.heroes[1].health.damage(40);
        assert_eq!(next_move(&session), Some(Move::Ability(HeroId(2))));

        session.turn = TurnSide::Enemy;
        assert_eq!(next_move(&session), Some(Move::EnemyAttack));

        session.status = SessionStatus::Victory;
        assert_eq!(next_move(&session), None);
    }

    #[tokio::test]
    async fn autopilot_wins_the_goblin_warren() {
        let (runtime, handle) = handle().await;
        let report = run_encounter(&handle, &ClientConfig::default()).await.unwrap();

        assert_eq!(report.outcome, CombatOutcome::Victory);
        assert!(report.actions > 0);
        let rewards = report.rewards.as_ref().unwrap();
        assert_eq!(rewards.gold_earned, 50);
        assert!(rewards.session.rewards_claimed);
        assert!(report.to_string().contains("Victory"));

        runtime.shutdown().await.unwrap();
    }
}
