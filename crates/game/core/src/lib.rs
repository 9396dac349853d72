//! Deterministic combat rules shared by the runtime and offline tools.
//!
//! `game-core` defines the canonical rules (session aggregate, dice, damage,
//! status effects, morale, combos, boss phases, environment) and exposes pure
//! APIs with no I/O, clocks, or async. All session mutation flows through
//! [`engine::CombatEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;

pub use combat::{
    BossPhase, BossProfile, DiceType, EffectType, MoraleEvent, MoraleLevel, MoraleState,
    StatusEffectState,
};
pub use config::GameConfig;
pub use engine::{
    ActionOutcome, ApplyStatusEffect, CancelCombat, CombatCommand, CombatEngine, CombatError,
    CombatEvent, CompleteCombat, EnemyAttack, ExecuteError, ExecutionOutcome, RewardClaim,
    RollDice, StartCombat, TransitionPhase, TransitionPhaseError, TurnRecord, UseSpecialAbility,
};
pub use env::{
    AbilityDefinition, AbilityOracle, ComboOracle, CombatEnv, EnemyDefinition, Env,
    EnvironmentOracle, EnvironmentalCondition, HeroClass, HeroOracle, HeroProfile, PcgRng,
    QuestDefinition, QuestOracle, RngOracle,
};
pub use error::{ErrorKind, ErrorSeverity, GameError};
pub use state::{
    CombatSession, CombatSessionSnapshot, Combatant, EnemyId, HeroId, ItemId, PlayerId, QuestId,
    SessionId, SessionStatus, TurnSide,
};
