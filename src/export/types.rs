//! Data types for saving finished paintings.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Handle returned for every save request, used to cancel or correlate outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaveTicket(pub(crate) u64);

impl SaveTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SaveTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    pub ticket: SaveTicket,
    /// Where the encoded image was written.
    pub path: PathBuf,
    /// Size of the encoded file.
    pub bytes_written: usize,
}

/// Outcome of a save request (success, failure, or cancellation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Success(SaveResult),
    Failed(SaveTicket, String),
    Cancelled(SaveTicket),
}

impl SaveOutcome {
    pub fn ticket(&self) -> SaveTicket {
        match self {
            SaveOutcome::Success(result) => result.ticket,
            SaveOutcome::Failed(ticket, _) | SaveOutcome::Cancelled(ticket) => *ticket,
        }
    }
}

/// Errors that can occur while encoding or writing a painting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(String),

    #[error("Save {0} cancelled before it started")]
    Cancelled(SaveTicket),

    #[error("Save worker is not running")]
    WorkerStopped,

    #[error("Save task failed: {0}")]
    TaskFailed(String),
}

/// Status of the save worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing has been saved yet.
    Idle,
    /// A request is being encoded or written.
    InProgress,
    /// The last request completed successfully.
    Success,
    /// The last request failed.
    Failed(String),
    /// The last request was cancelled before it started.
    Cancelled,
}
