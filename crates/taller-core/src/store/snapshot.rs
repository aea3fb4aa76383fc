//! Snapshot store: the whole workflow as one overwritten JSON blob.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::WorkflowError;
use crate::workflow::Workflow;

/// Durable overwrite-snapshot of the entire workflow.
///
/// Design:
/// - `save` writes a temp file next to the blob and renames it over,
///   so a crash mid-write never leaves a torn snapshot.
/// - `load` never fails the caller: a missing, empty, or unreadable
///   blob falls back to a fresh workflow with a diagnostic.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the blob with the current workflow.
    pub fn save(&self, workflow: &Workflow) -> Result<(), WorkflowError> {
        let bytes = serde_json::to_vec_pretty(workflow)
            .map_err(|e| WorkflowError::persistence(&self.path, io::Error::from(e)))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|e| WorkflowError::persistence(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| WorkflowError::persistence(&self.path, e))?;
        Ok(())
    }

    /// Read the previous snapshot, or a fresh workflow when none is
    /// usable.
    pub fn load(&self) -> Workflow {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                tracing::info!(path = %self.path.display(), "snapshot empty, starting fresh");
                return Workflow::new();
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no snapshot found, starting fresh");
                return Workflow::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "snapshot unreadable, starting fresh");
                return Workflow::new();
            }
        };

        match serde_json::from_slice::<Workflow>(&bytes) {
            Ok(mut workflow) => {
                workflow.restore_missing_queues();
                workflow
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "snapshot corrupt, starting fresh");
                Workflow::new()
            }
        }
    }
}
