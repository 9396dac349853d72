//! In-memory combat log implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use game_core::SessionId;

use crate::repository::{CombatLogEntry, CombatLogRepository, RepositoryError, Result};

/// Combat log held in memory, one vector per session.
#[derive(Default)]
pub struct InMemoryCombatLog {
    entries: RwLock<HashMap<SessionId, Vec<CombatLogEntry>>>,
}

impl InMemoryCombatLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CombatLogRepository for InMemoryCombatLog {
    fn append(&self, session: SessionId, entries: &[CombatLogEntry]) -> Result<()> {
        let mut logs = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        logs.entry(session).or_default().extend_from_slice(entries);
        Ok(())
    }

    fn read(&self, session: SessionId) -> Result<Vec<CombatLogEntry>> {
        let logs = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(logs.get(&session).cloned().unwrap_or_default())
    }

    fn len(&self, session: SessionId) -> Result<u64> {
        let logs = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(logs.get(&session).map_or(0, |entries| entries.len() as u64))
    }

    fn truncate(&self, session: SessionId, len: u64) -> Result<()> {
        let mut logs = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if let Some(entries) = logs.get_mut(&session) {
            entries.truncate(usize::try_from(len).unwrap_or(usize::MAX));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use game_core::TurnRecord;
    use game_core::engine::RecordedAction;

    #[test]
    fn truncate_keeps_the_prefix() {
        let log = InMemoryCombatLog::new();
        let session = SessionId(1);
        let records: Vec<_> = (0..3)
            .map(|nonce| TurnRecord::new(nonce, 1, RecordedAction::RollDice))
            .collect();
        let (entries, _) = CombatLogEntry::chain(session, 0, [0; 32], &records, Utc::now());
        log.append(session, &entries).unwrap();

        log.truncate(session, 1).unwrap();
        assert_eq!(log.read(session).unwrap(), entries[..1].to_vec());
        log.truncate(SessionId(2), 0).unwrap();
        assert_eq!(log.len(SessionId(2)).unwrap(), 0);
    }
}
