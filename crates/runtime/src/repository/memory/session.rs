//! In-memory SessionRepository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use game_core::{CombatSession, SessionId};

use crate::repository::{RepositoryError, Result, SessionRepository};

/// Sessions kept in a map. Not persistent across process restarts.
#[derive(Default)]
pub struct InMemorySessionRepo {
    sessions: RwLock<BTreeMap<SessionId, CombatSession>>,
}

impl InMemorySessionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepo {
    fn save(&self, session: &CombatSession) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    fn load(&self, id: SessionId) -> Result<Option<CombatSession>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sessions.get(&id).cloned())
    }

    fn exists(&self, id: SessionId) -> bool {
        self.sessions
            .read()
            .map(|sessions| sessions.contains_key(&id))
            .unwrap_or(false)
    }

    fn delete(&self, id: SessionId) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.remove(&id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<SessionId>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sessions.keys().copied().collect())
    }
}
