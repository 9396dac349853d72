//! The combat session aggregate.

use std::collections::BTreeMap;

use crate::combat::{BossState, ComboState, MoraleState, StatusEffects};
use crate::env::{
    AbilityDefinition, BossWeakness, ClassSet, CombatStats, EnemyDefinition,
    EnvironmentalCondition, HeroClass, PartyCombo,
};
use crate::state::{Combatant, EnemyId, HealthPool, HeroId, PlayerId, QuestId, SessionId};

/// Lifecycle of a session.
///
/// `Preparing → InProgress → {Victory, Defeat}` and `Preparing | InProgress →
/// Cancelled`. The last three are terminal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Preparing,
    InProgress,
    Victory,
    Defeat,
    Cancelled,
}

impl SessionStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Cancelled)
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TurnSide {
    #[default]
    Hero,
    Enemy,
}

/// Unix timestamps in milliseconds, supplied by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionTimestamps {
    pub created_at: u64,
    pub started_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub archived_at: Option<u64>,
}

/// A hero as copied into the session at start.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroCombatant {
    pub id: HeroId,
    pub name: String,
    pub class: HeroClass,
    pub stats: CombatStats,
    pub health: HealthPool,
    pub morale: MoraleState,
    pub statuses: StatusEffects,
    pub ability: AbilityDefinition,
    /// Turn pairs until the ability is usable again.
    pub cooldown: u32,
}

impl HeroCombatant {
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    #[inline]
    pub fn combatant(&self) -> Combatant {
        Combatant::Hero(self.id)
    }
}

/// Mutable state of the enemy currently fought.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyCombatant {
    pub id: EnemyId,
    pub health: HealthPool,
    pub morale: MoraleState,
    pub statuses: StatusEffects,
    /// Present for boss-flagged enemies.
    pub boss: Option<BossState>,
}

impl EnemyCombatant {
    pub fn spawn(definition: &EnemyDefinition, morale_baseline: u8) -> Self {
        Self {
            id: definition.id,
            health: HealthPool::full(definition.max_health),
            morale: MoraleState::new(morale_baseline),
            statuses: StatusEffects::new(),
            boss: definition.boss.as_ref().map(|_| BossState::new()),
        }
    }

    #[inline]
    pub fn combatant(&self) -> Combatant {
        Combatant::Enemy(self.id)
    }
}

/// A discovered combo paired with one of its weaknesses.
///
/// Whether it applies is re-evaluated on every action against the living
/// party and the current enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveWeakness {
    pub combo: PartyCombo,
    pub weakness: BossWeakness,
}

/// Aggregate root of one encounter. Mutated only through the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub id: SessionId,
    pub player: PlayerId,
    pub quest: QuestId,
    pub status: SessionStatus,
    pub turn: TurnSide,
    /// Turn pairs started so far, starting at 1.
    pub turn_number: u32,
    /// Number of actions executed.
    pub nonce: u64,
    /// Fixed at creation; every roll seed derives from it.
    pub seed: u64,
    /// Party in roster order.
    pub heroes: Vec<HeroCombatant>,
    /// Rotation cursor into `heroes` for dice rolls.
    pub active_hero: usize,
    /// The quest's enemy lineup, in order.
    pub enemies: Vec<EnemyDefinition>,
    pub enemy_index: usize,
    pub enemy: EnemyCombatant,
    pub combo: ComboState,
    pub environment: EnvironmentalCondition,
    pub weaknesses: Vec<ActiveWeakness>,
    pub defeated_enemies: Vec<EnemyId>,
    pub rewards_claimed: bool,
    pub archived: bool,
    /// Running SHA-256 chain over every turn record.
    pub log_digest: [u8; 32],
    pub timestamps: SessionTimestamps,
}

/// Sessions are plain values; a snapshot is a clone.
pub type CombatSessionSnapshot = CombatSession;

impl CombatSession {
    /// Creates an empty session awaiting `StartCombat`.
    pub fn prepare(
        id: SessionId,
        player: PlayerId,
        quest: QuestId,
        seed: u64,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            player,
            quest,
            status: SessionStatus::Preparing,
            turn: TurnSide::Hero,
            turn_number: 0,
            nonce: 0,
            seed,
            heroes: Vec::new(),
            active_hero: 0,
            enemies: Vec::new(),
            enemy_index: 0,
            enemy: EnemyCombatant {
                id: EnemyId::default(),
                health: HealthPool::full(0),
                morale: MoraleState::default(),
                statuses: StatusEffects::new(),
                boss: None,
            },
            combo: ComboState::new(),
            environment: EnvironmentalCondition::clear(),
            weaknesses: Vec::new(),
            defeated_enemies: Vec::new(),
            rewards_claimed: false,
            archived: false,
            log_digest: [0; 32],
            timestamps: SessionTimestamps {
                created_at,
                ..SessionTimestamps::default()
            },
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Terminal with no reward left to claim; no command can change it again.
    pub fn is_settled(&self) -> bool {
        self.is_terminal() && (self.status != SessionStatus::Victory || self.rewards_claimed)
    }

    pub fn current_enemy(&self) -> Option<&EnemyDefinition> {
        self.enemies.get(self.enemy_index)
    }

    pub fn hero_ids(&self) -> Vec<HeroId> {
        self.heroes.iter().map(|hero| hero.id).collect()
    }

    pub fn hero_index(&self, id: HeroId) -> Option<usize> {
        self.heroes.iter().position(|hero| hero.id == id)
    }

    pub fn hero(&self, id: HeroId) -> Option<&HeroCombatant> {
        self.heroes.iter().find(|hero| hero.id == id)
    }

    pub fn living_heroes(&self) -> impl Iterator<Item = &HeroCombatant> {
        self.heroes.iter().filter(|hero| hero.is_alive())
    }

    pub fn all_heroes_down(&self) -> bool {
        self.heroes.iter().all(|hero| !hero.is_alive())
    }

    /// Classes of the living party.
    pub fn party_classes(&self) -> ClassSet {
        ClassSet::of(self.living_heroes().map(|hero| hero.class))
    }

    /// The hero whose turn it is to roll: the first living hero at or after
    /// the rotation cursor.
    pub fn active_hero_index(&self) -> Option<usize> {
        let len = self.heroes.len();
        (0..len)
            .map(|offset| (self.active_hero + offset) % len)
            .find(|&index| self.heroes[index].is_alive())
    }

    /// Moves the rotation cursor past `index`.
    pub fn advance_cursor(&mut self, index: usize) {
        if !self.heroes.is_empty() {
            self.active_hero = (index + 1) % self.heroes.len();
        }
    }

    /// Strongest weakness against `enemy` whose combo the living party holds.
    pub fn weakness_against(&self, enemy: EnemyId) -> Option<&BossWeakness> {
        let party = self.party_classes();
        self.weaknesses
            .iter()
            .filter(|active| active.weakness.enemy == enemy)
            .filter(|active| active.combo.is_satisfied_by(party))
            .map(|active| &active.weakness)
            .fold(None, |best: Option<&BossWeakness>, weakness| match best {
                Some(current) if current.roll_reduction >= weakness.roll_reduction => {
                    Some(current)
                }
                _ => Some(weakness),
            })
    }

    pub fn health_map(&self) -> BTreeMap<HeroId, HealthPool> {
        self.heroes
            .iter()
            .map(|hero| (hero.id, hero.health))
            .collect()
    }

    pub fn cooldowns(&self) -> BTreeMap<HeroId, u32> {
        self.heroes
            .iter()
            .map(|hero| (hero.id, hero.cooldown))
            .collect()
    }

    /// Structural invariants checked after every mutation.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if self.heroes.iter().any(|hero| hero.health.current() > hero.health.max()) {
            return Err("hero health above max");
        }
        if self.enemy.health.current() > self.enemy.health.max() {
            return Err("enemy health above max");
        }
        if self.status == SessionStatus::InProgress {
            if self.heroes.is_empty() {
                return Err("in-progress session without heroes");
            }
            if self.current_enemy().map(|enemy| enemy.id) != Some(self.enemy.id) {
                return Err("enemy state does not match lineup");
            }
            if self.all_heroes_down() {
                return Err("in-progress session with no living hero");
            }
        }
        if self.rewards_claimed && self.status != SessionStatus::Victory {
            return Err("rewards claimed without victory");
        }
        if self.combo.multiplier == 0 {
            return Err("combo multiplier is zero");
        }
        Ok(())
    }
}
