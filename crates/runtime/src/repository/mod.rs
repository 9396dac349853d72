//! Repository layer for dynamic runtime data.
//!
//! Repositories handle data that CHANGES during play:
//! - Combat sessions (read at action start, written once at action end)
//! - The per-session combat log (append-only)
//!
//! Static content (heroes, quests, combos) is served by oracles, not repositories.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::{FileCombatLog, FileSessionRepository, LogFile};
pub use memory::{InMemoryCombatLog, InMemorySessionRepo};
pub use traits::{CombatLogRepository, SessionRepository};
pub use types::CombatLogEntry;
