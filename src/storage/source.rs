//! Task and ledger sources.
//!
//! The hub owns tasks and the assignment ledger; the scheduler only needs a
//! snapshot of both. [`TaskSource`] is that boundary, and [`FileTaskSource`]
//! serves snapshots exported as JSON files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::IntegrityError;
use crate::ledger::{AssignmentRecord, LedgerSnapshot};
use crate::model::Task;

/// Errors that can occur while loading or recording snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to read or write to the filesystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize snapshot data.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested file does not exist.
    #[error("Snapshot file not found: {0}")]
    NotFound(PathBuf),

    /// The loaded data is internally inconsistent.
    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),
}

/// Producer of task and ledger snapshots.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Loads the task with its roster, documents and annotations.
    async fn load_task(&self) -> Result<Task, StorageError>;

    /// Loads the current assignment ledger of the task.
    async fn load_ledger(&self) -> Result<LedgerSnapshot, StorageError>;
}

/// Snapshot source backed by a task JSON file and a ledger JSON file.
pub struct FileTaskSource {
    task_path: PathBuf,
    ledger_path: PathBuf,
}

impl FileTaskSource {
    /// Creates a source reading `task_path` and `ledger_path`.
    pub fn new(task_path: impl Into<PathBuf>, ledger_path: impl Into<PathBuf>) -> Self {
        Self {
            task_path: task_path.into(),
            ledger_path: ledger_path.into(),
        }
    }

    /// Path of the task file.
    pub fn task_path(&self) -> &Path {
        &self.task_path
    }

    /// Path of the ledger file.
    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Loads both snapshots and checks them against each other.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Integrity` if the task or its ledger reference
    /// documents or annotators outside the task.
    pub async fn load_checked(&self) -> Result<(Task, LedgerSnapshot), StorageError> {
        let task = self.load_task().await?;
        let ledger = self.load_ledger().await?;
        task.validate()?;
        ledger.validate_against(&task)?;
        Ok((task, ledger))
    }

    /// Appends records to the ledger file and returns the new ledger length.
    pub async fn record(&self, records: &[AssignmentRecord]) -> Result<usize, StorageError> {
        let mut ledger = self.load_ledger().await?;
        ledger.append(records.iter().cloned());

        let json = serde_json::to_string_pretty(&ledger)?;
        let mut file = fs::File::create(&self.ledger_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;

        info!(
            path = %self.ledger_path.display(),
            appended = records.len(),
            total = ledger.len(),
            "Recorded assignments"
        );
        Ok(ledger.len())
    }
}

#[async_trait]
impl TaskSource for FileTaskSource {
    async fn load_task(&self) -> Result<Task, StorageError> {
        if !fs::try_exists(&self.task_path).await? {
            return Err(StorageError::NotFound(self.task_path.clone()));
        }
        let contents = fs::read_to_string(&self.task_path).await?;
        let task: Task = serde_json::from_str(&contents)?;
        debug!(
            task = %task.id,
            annotators = task.annotators.len(),
            documents = task.documents.len(),
            annotations = task.annotations.len(),
            "Loaded task"
        );
        Ok(task)
    }

    async fn load_ledger(&self) -> Result<LedgerSnapshot, StorageError> {
        // A task that was never scheduled has no ledger file yet.
        if !fs::try_exists(&self.ledger_path).await? {
            return Ok(LedgerSnapshot::default());
        }
        let contents = fs::read_to_string(&self.ledger_path).await?;
        let ledger: LedgerSnapshot = serde_json::from_str(&contents)?;
        debug!(records = ledger.len(), "Loaded ledger");
        Ok(ledger)
    }
}
