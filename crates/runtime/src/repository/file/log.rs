//! Append-only log files.
//!
//! [`LogFile<T>`] stores any serializable type in a length-prefixed log;
//! [`FileCombatLog`] keeps one such file per session.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Serialize, de::DeserializeOwned};

use game_core::SessionId;

use crate::repository::{CombatLogEntry, CombatLogRepository, RepositoryError, Result};

// ============================================================================
// Generic LogFile
// ============================================================================

/// Append-only log of `T` items:
/// ```text
/// [u32 length][bincode serialized T]
/// [u32 length][bincode serialized T]
/// ...
/// ```
pub struct LogFile<T> {
    path: PathBuf,
    writer: BufWriter<File>,
    /// Byte offset of the next write.
    current_offset: u64,
    entries: u64,
    _phantom: PhantomData<T>,
}

impl<T> LogFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Opens `base_dir/filename` for appending, creating both if missing.
    ///
    /// Existing entries are scanned once to recover the entry count.
    pub fn open_or_create(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)?;
        let path = base_dir.join(filename.as_ref());

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let current_offset = file.metadata()?.len();
        let writer = BufWriter::new(file);

        let mut log = Self {
            path,
            writer,
            current_offset,
            entries: 0,
            _phantom: PhantomData,
        };
        log.entries = log.read_all()?.len() as u64;

        tracing::debug!(
            target: "runtime::repository",
            "opened log {} at offset {} ({} entries)",
            log.path.display(),
            log.current_offset,
            log.entries
        );
        Ok(log)
    }

    /// Appends an item and returns the byte offset where it was written.
    pub fn append(&mut self, item: &T) -> Result<u64> {
        let offset = self.current_offset;

        let bytes =
            bincode::serialize(item).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let len = u32::try_from(bytes.len())
            .map_err(|_| RepositoryError::Serialization("log entry exceeds 4 GiB".into()))?;

        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(&bytes)?;

        self.current_offset += 4 + bytes.len() as u64;
        self.entries += 1;
        Ok(offset)
    }

    /// Reads the item at `byte_offset`.
    ///
    /// Returns `None` past the end of the file, otherwise the item and the
    /// offset of the next one. A truncated tail is reported as corruption.
    pub fn read_at_offset(&self, byte_offset: u64) -> Result<Option<(T, u64)>> {
        let file = File::open(&self.path)?;
        let file_size = file.metadata()?.len();
        if byte_offset >= file_size {
            return Ok(None);
        }

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(byte_offset))?;

        let mut len_bytes = [0u8; 4];
        reader.read_exact(&mut len_bytes).map_err(truncated)?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        let mut data = vec![0u8; len];
        reader.read_exact(&mut data).map_err(truncated)?;

        let item = bincode::deserialize(&data)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(Some((item, byte_offset + 4 + len as u64)))
    }

    /// Reads every flushed item, oldest first.
    pub fn read_all(&self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut offset = 0;
        while let Some((item, next)) = self.read_at_offset(offset)? {
            items.push(item);
            offset = next;
        }
        Ok(items)
    }

    /// Drops every item past the first `keep`.
    pub fn truncate(&mut self, keep: u64) -> Result<()> {
        if keep >= self.entries {
            return Ok(());
        }
        self.writer.flush()?;

        let mut offset = 0;
        for _ in 0..keep {
            match self.read_at_offset(offset)? {
                Some((_, next)) => offset = next,
                None => break,
            }
        }
        self.writer.get_ref().set_len(offset)?;
        self.current_offset = offset;
        self.entries = keep;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> u64 {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Size of the log in bytes, including unflushed writes.
    pub fn size(&self) -> u64 {
        self.current_offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn truncated(error: std::io::Error) -> RepositoryError {
    if error.kind() == ErrorKind::UnexpectedEof {
        RepositoryError::CorruptedData("log ends in a partial entry".into())
    } else {
        RepositoryError::Io(error)
    }
}

impl<T> Drop for LogFile<T> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(
                target: "runtime::repository",
                "failed to flush log '{}' on drop: {}",
                self.path.display(),
                e
            );
        }
    }
}

// ============================================================================
// Per-session combat log
// ============================================================================

/// Combat log stored as `combat_{id}.log` per session.
///
/// Files are opened on first write and kept open until the session is closed;
/// every append is flushed before returning so readers see it immediately.
/// Reads of a session without an open file use a short-lived handle.
pub struct FileCombatLog {
    base_dir: PathBuf,
    files: Mutex<HashMap<SessionId, LogFile<CombatLogEntry>>>,
}

impl FileCombatLog {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            files: Mutex::new(HashMap::new()),
        })
    }

    fn filename(session: SessionId) -> String {
        format!("combat_{}.log", session.get())
    }

    fn with_log<R>(
        &self,
        session: SessionId,
        f: impl FnOnce(&mut LogFile<CombatLogEntry>) -> Result<R>,
    ) -> Result<R> {
        let mut files = self.files.lock().map_err(|_| RepositoryError::LockPoisoned)?;
        let log = match files.entry(session) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => entry.insert(
                LogFile::open_or_create(&self.base_dir, Self::filename(session))?,
            ),
        };
        f(log)
    }

    /// Runs `f` against the open file, or a temporary handle when the session
    /// has none. `None` when the session has no log yet.
    fn peek<R>(
        &self,
        session: SessionId,
        f: impl FnOnce(&LogFile<CombatLogEntry>) -> Result<R>,
    ) -> Result<Option<R>> {
        let files = self.files.lock().map_err(|_| RepositoryError::LockPoisoned)?;
        if let Some(log) = files.get(&session) {
            return f(log).map(Some);
        }
        drop(files);

        if !self.base_dir.join(Self::filename(session)).exists() {
            return Ok(None);
        }
        let log = LogFile::open_or_create(&self.base_dir, Self::filename(session))?;
        f(&log).map(Some)
    }

    #[cfg(test)]
    fn open_files(&self) -> usize {
        self.files.lock().map_or(0, |files| files.len())
    }
}

impl CombatLogRepository for FileCombatLog {
    fn append(&self, session: SessionId, entries: &[CombatLogEntry]) -> Result<()> {
        self.with_log(session, |log| {
            for entry in entries {
                log.append(entry)?;
            }
            log.flush()
        })
    }

    fn read(&self, session: SessionId) -> Result<Vec<CombatLogEntry>> {
        self.peek(session, |log| log.read_all()).map(Option::unwrap_or_default)
    }

    fn len(&self, session: SessionId) -> Result<u64> {
        self.peek(session, |log| Ok(log.len())).map(Option::unwrap_or_default)
    }

    fn truncate(&self, session: SessionId, len: u64) -> Result<()> {
        if !self.base_dir.join(Self::filename(session)).exists() {
            return Ok(());
        }
        self.with_log(session, |log| log.truncate(len))
    }

    fn close(&self, session: SessionId) -> Result<()> {
        let mut files = self.files.lock().map_err(|_| RepositoryError::LockPoisoned)?;
        if let Some(mut log) = files.remove(&session) {
            log.flush()?;
            tracing::debug!(
                target: "runtime::repository",
                "closed log {}",
                log.path().display()
            );
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
