//! Persisted high-score slot.

use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// A single persisted high-score value.
pub trait ScoreStore: Send + std::fmt::Debug {
    /// Reads the stored high score. `None` if nothing has been stored yet.
    fn read_high_score(&self) -> Result<Option<u64>, StoreError>;

    /// Overwrites the stored high score.
    fn write_high_score(&self, value: u64) -> Result<(), StoreError>;
}

/// Reads the high score, treating absence and read failures as zero.
#[instrument(skip(store))]
pub fn load_high_score(store: &dyn ScoreStore) -> u64 {
    match store.read_high_score() {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!("No stored high score");
            0
        }
        Err(e) => {
            warn!(error = %e, "Unreadable high score, starting from zero");
            0
        }
    }
}

/// On-disk document holding the high score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighScoreRecord {
    high_score: u64,
    updated_at: DateTime<Utc>,
}

/// High score kept in a small JSON file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Creates a store backed by the file at `path`. The file need not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns when the high score was last written, if ever.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.read_record()?.map(|record| record.updated_at))
    }

    fn read_record(&self) -> Result<Option<HighScoreRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StoreError::new(format!(
                "Failed to read '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        let record = serde_json::from_str(&content).map_err(|e| {
            StoreError::new(format!(
                "Failed to parse '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(record))
    }
}

impl ScoreStore for FileScoreStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read_high_score(&self) -> Result<Option<u64>, StoreError> {
        let value = self.read_record()?.map(|record| record.high_score);
        debug!(?value, "Read high score");
        Ok(value)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn write_high_score(&self, value: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::new(format!(
                    "Failed to create '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let record = HighScoreRecord {
            high_score: value,
            updated_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::new(format!("Failed to encode high score: {}", e)))?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::new(format!(
                "Failed to write '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        info!(value, "High score saved");
        Ok(())
    }
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    slot: Arc<Mutex<Option<u64>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryScoreStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value`.
    pub fn with_high_score(value: u64) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value))),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns how many times the slot has been written.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read_high_score(&self) -> Result<Option<u64>, StoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::new(format!("Score slot poisoned: {}", e)))?;
        Ok(*slot)
    }

    fn write_high_score(&self, value: u64) -> Result<(), StoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::new(format!("Score slot poisoned: {}", e)))?;
        *slot = Some(value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Score store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Score store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
