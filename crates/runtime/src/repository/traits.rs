//! Repository contracts for combat sessions and their logs.

use game_core::{CombatSession, SessionId};

use super::{CombatLogEntry, Result};

/// Durable store of session aggregates, keyed by session id.
///
/// The runtime reads a session when an action starts and saves it exactly
/// once when the action resolves. Implementations must make `save` atomic: a
/// reader never observes a half-written session.
pub trait SessionRepository: Send + Sync {
    fn save(&self, session: &CombatSession) -> Result<()>;

    fn load(&self, id: SessionId) -> Result<Option<CombatSession>>;

    fn exists(&self, id: SessionId) -> bool;

    fn delete(&self, id: SessionId) -> Result<()>;

    /// All stored session ids, ascending.
    fn list_ids(&self) -> Result<Vec<SessionId>>;
}

/// Append-only combat log sink.
///
/// # File Format
///
/// File-backed implementations store one log per session as:
/// ```text
/// [u32 length][bincode serialized CombatLogEntry]
/// ```
pub trait CombatLogRepository: Send + Sync {
    /// Appends entries in order. Entries of one call land contiguously.
    fn append(&self, session: SessionId, entries: &[CombatLogEntry]) -> Result<()>;

    /// Every entry of a session, oldest first. Unknown sessions read as empty.
    fn read(&self, session: SessionId) -> Result<Vec<CombatLogEntry>>;

    /// Number of entries recorded for a session.
    fn len(&self, session: SessionId) -> Result<u64>;

    /// Drops every entry past the first `len`. Used to undo an append whose
    /// session save failed.
    fn truncate(&self, session: SessionId, len: u64) -> Result<()>;

    /// Releases any resources held for a session that will not be written
    /// again. Reads keep working afterwards.
    fn close(&self, _session: SessionId) -> Result<()> {
        Ok(())
    }
}
