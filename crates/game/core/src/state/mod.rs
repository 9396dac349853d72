//! Authoritative combat state.
//!
//! The session aggregate, its identity keys, and health pools. Runtime layers
//! clone or query this state but mutate it exclusively through the engine.
mod health;
mod ids;
mod session;

pub use health::HealthPool;
pub use ids::{Combatant, ComboId, EnemyId, HeroId, ItemId, PlayerId, QuestId, SessionId};
pub use session::{
    ActiveWeakness, CombatSession, CombatSessionSnapshot, EnemyCombatant, HeroCombatant,
    SessionStatus, SessionTimestamps, TurnSide,
};
