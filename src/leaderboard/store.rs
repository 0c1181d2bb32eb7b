//! Score storage
//!
//! The service owns one `Arc<dyn ScoreStore>` built at startup. Stores keep
//! every entry ever submitted; ranking happens on read.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{Leaderboard, ScoreEntry};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// Stored data did not parse
    Corrupt(String),
    /// A writer panicked while holding the lock
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "score store I/O error: {}", e),
            StoreError::Corrupt(msg) => write!(f, "score store is corrupt: {}", msg),
            StoreError::Poisoned => write!(f, "score store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Backing storage for leaderboard entries
pub trait ScoreStore: Send + Sync {
    /// Highest `limit` entries, sorted descending by score
    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, StoreError>;

    /// Append one entry
    fn insert(&self, entry: ScoreEntry) -> Result<(), StoreError>;
}

/// Process-local store (lost on restart)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<ScoreEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(Leaderboard::from_entries(entries.clone(), limit).entries)
    }

    fn insert(&self, entry: ScoreEntry) -> Result<(), StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(entry);
        Ok(())
    }
}

/// Entries persisted as a JSON array on disk
///
/// Writes go to a temp file first and are renamed over the real one, so a
/// crash mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Vec<ScoreEntry>>,
}

impl JsonFileStore {
    /// Open (or create on first insert) the file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!(
            "Opened score file {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(entries).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(Leaderboard::from_entries(entries.clone(), limit).entries)
    }

    fn insert(&self, entry: ScoreEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.push(entry);
        if let Err(e) = self.persist(&entries) {
            // Keep memory and disk in agreement
            entries.pop();
            return Err(e);
        }
        Ok(())
    }
}
