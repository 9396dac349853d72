use std::collections::BTreeSet;

use crate::combat::{ComboState, MoraleState, StatusEffects};
use crate::env::{CombatEnv, EnvironmentalCondition};
use crate::state::{
    ActiveWeakness, CombatSession, EnemyCombatant, EnemyId, HealthPool, HeroCombatant, HeroId,
    SessionStatus, TurnSide,
};

use crate::engine::errors::CombatError;
use crate::engine::record::RecordedAction;
use crate::engine::transition::{ActionTransition, ResolutionContext};

/// Commits a party to the session's quest.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartCombat {
    /// Roster order is significant: it drives hero rotation and target ties.
    pub heroes: Vec<HeroId>,
}

impl StartCombat {
    pub fn new(heroes: impl IntoIterator<Item = HeroId>) -> Self {
        Self {
            heroes: heroes.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartOutcome {
    pub heroes: Vec<HeroId>,
    pub enemy: EnemyId,
    pub enemy_health: u32,
    pub environment: EnvironmentalCondition,
    pub message: String,
}

impl ActionTransition for StartCombat {
    type Output = StartOutcome;

    fn pre_validate(
        &self,
        session: &CombatSession,
        env: &CombatEnv<'_>,
        ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        if session.status != SessionStatus::Preparing {
            return Err(CombatError::AlreadyStarted(session.status));
        }
        if self.heroes.is_empty() {
            return Err(CombatError::EmptyRoster);
        }
        if self.heroes.len() > ctx.config.max_party_size {
            return Err(CombatError::RosterTooLarge {
                size: self.heroes.len(),
                limit: ctx.config.max_party_size,
            });
        }

        let mut seen = BTreeSet::new();
        let heroes = env.heroes()?;
        let abilities = env.abilities()?;
        for &id in &self.heroes {
            if !seen.insert(id) {
                return Err(CombatError::DuplicateHero(id));
            }
            let profile = heroes.hero(id).ok_or(CombatError::HeroNotFound(id))?;
            if abilities.ability(profile.class).is_none() {
                return Err(CombatError::UnknownClass(profile.class));
            }
        }

        let quests = env.quests()?;
        let quest = quests
            .quest(session.quest)
            .ok_or(CombatError::QuestNotFound(session.quest))?;
        if quest.enemies.is_empty() {
            return Err(CombatError::QuestHasNoEnemies(quest.id));
        }
        for &enemy in &quest.enemies {
            quests.enemy(enemy).ok_or(CombatError::EnemyNotFound(enemy))?;
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut CombatSession,
        env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError> {
        let baseline = ctx.config.morale_baseline;
        let heroes = env.heroes()?;
        let abilities = env.abilities()?;
        let quests = env.quests()?;
        let combos = env.combos()?;

        session.heroes = self
            .heroes
            .iter()
            .map(|&id| -> Result<HeroCombatant, CombatError> {
                let profile = heroes.hero(id).ok_or(CombatError::HeroNotFound(id))?;
                let ability = abilities
                    .ability(profile.class)
                    .ok_or(CombatError::UnknownClass(profile.class))?;
                Ok(HeroCombatant {
                    id,
                    name: profile.name,
                    class: profile.class,
                    stats: profile.stats,
                    health: HealthPool::full(profile.stats.max_health),
                    morale: MoraleState::new(baseline),
                    statuses: StatusEffects::new(),
                    ability,
                    cooldown: 0,
                })
            })
            .collect::<Result<_, CombatError>>()?;

        let quest = quests
            .quest(session.quest)
            .ok_or(CombatError::QuestNotFound(session.quest))?;
        session.enemies = quest
            .enemies
            .iter()
            .map(|&id| quests.enemy(id).ok_or(CombatError::EnemyNotFound(id)))
            .collect::<Result<_, CombatError>>()?;
        session.enemy_index = 0;
        let first = session
            .enemies
            .first()
            .cloned()
            .ok_or(CombatError::QuestHasNoEnemies(quest.id))?;
        session.enemy = EnemyCombatant::spawn(&first, baseline);

        session.weaknesses = session
            .enemies
            .iter()
            .flat_map(|enemy| combos.weaknesses(enemy.id))
            .filter(|weakness| combos.is_discovered(session.player, weakness.combo))
            .filter_map(|weakness| {
                combos
                    .combo(weakness.combo)
                    .map(|combo| ActiveWeakness { combo, weakness })
            })
            .collect();

        session.environment = env
            .environment()?
            .active_condition(session.quest)
            .unwrap_or_else(EnvironmentalCondition::clear);

        session.status = SessionStatus::InProgress;
        session.turn = TurnSide::Hero;
        session.turn_number = 1;
        session.active_hero = 0;
        session.combo = ComboState::new();
        session.defeated_enemies.clear();
        session.timestamps.started_at = Some(ctx.now);

        let mut record = ctx.record(session, RecordedAction::Start);
        record.target = Some(session.enemy.combatant());
        record.resulting_health = Some(session.enemy.health.current());
        ctx.push_record(session, record);

        let message = format!(
            "{} heroes engage {} ({} hp), conditions: {}",
            session.heroes.len(),
            first.name,
            first.max_health,
            session.environment.kind,
        );
        Ok(StartOutcome {
            heroes: session.hero_ids(),
            enemy: session.enemy.id,
            enemy_health: session.enemy.health.current(),
            environment: session.environment,
            message,
        })
    }
}
