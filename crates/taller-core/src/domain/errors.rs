//! Workflow error types.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Stage;

/// Errors surfaced by the workflow engine.
///
/// None of these is fatal: the driver reports them and returns to the
/// menu. `Persistence` leaves the in-memory workflow consistent; the
/// triggering operation is considered applied in memory.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("duplicate device identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("no devices waiting in {0}")]
    QueueEmpty(Stage),

    #[error("no device found with identifier: {0}")]
    NotFound(String),

    #[error("persistence failure on {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WorkflowError {
    pub fn persistence(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
