//! File-based SessionRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::{CombatSession, SessionId};

use crate::repository::{RepositoryError, Result, SessionRepository};

/// Stores each session as `session_{id}.bin` in bincode format.
///
/// Saves go through a temp file and an atomic rename, so a crash mid-write
/// leaves the previous version intact.
pub struct FileSessionRepository {
    base_dir: PathBuf,
}

impl FileSessionRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn session_path(&self, id: SessionId) -> PathBuf {
        self.base_dir.join(format!("session_{}.bin", id.get()))
    }
}

impl SessionRepository for FileSessionRepository {
    fn save(&self, session: &CombatSession) -> Result<()> {
        let path = self.session_path(session.id);
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(session)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            target: "runtime::repository",
            session = %session.id,
            nonce = session.nonce,
            "saved session to {}",
            path.display()
        );
        Ok(())
    }

    fn load(&self, id: SessionId) -> Result<Option<CombatSession>> {
        let path = self.session_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let session: CombatSession = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        if session.id != id {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds {}",
                path.display(),
                session.id
            )));
        }
        Ok(Some(session))
    }

    fn exists(&self, id: SessionId) -> bool {
        self.session_path(id).exists()
    }

    fn delete(&self, id: SessionId) -> Result<()> {
        let path = self.session_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(target: "runtime::repository", session = %id, "deleted session");
        }
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<SessionId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(id) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix("session_"))
                .and_then(|name| name.strip_suffix(".bin"))
                .and_then(|id| id.parse::<u64>().ok())
            {
                ids.push(SessionId(id));
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{PlayerId, QuestId};
    use tempfile::TempDir;

    #[test]
    fn save_load_and_list() {
        let dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();

        let mut session = CombatSession::prepare(SessionId(3), PlayerId(1), QuestId(2), 99, 1_000);
        repo.save(&session).unwrap();
        session.nonce = 5;
        repo.save(&session).unwrap();

        assert!(repo.exists(SessionId(3)));
        assert_eq!(repo.load(SessionId(3)).unwrap(), Some(session));
        assert_eq!(repo.load(SessionId(4)).unwrap(), None);
        assert_eq!(repo.list_ids().unwrap(), vec![SessionId(3)]);
        assert!(!dir.path().join("session_3.bin.tmp").exists());

        repo.delete(SessionId(3)).unwrap();
        assert!(!repo.exists(SessionId(3)));
    }
}
