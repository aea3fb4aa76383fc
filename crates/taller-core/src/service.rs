//! Operator-facing service: the workflow wired to its persistence.

use std::path::Path;

use crate::domain::{Device, Stage, WorkflowError};
use crate::queue::StageQueue;
use crate::store::{HistoryLog, SnapshotStore};
use crate::workflow::{Delivery, Workflow};

const SNAPSHOT_FILE: &str = "technical_support_data.json";
const HISTORY_FILE: &str = "service_records.log";

/// Composes the in-memory workflow with its two persistence surfaces.
///
/// Every mutating operation runs the same sequence: mutate the
/// workflow, append the affected device to the ledger, rewrite the
/// snapshot. Exceptions with no ledger record: cancelled deliveries
/// and deletions. A persistence failure is reported to the caller but
/// the in-memory mutation stays applied.
pub struct RepairService {
    workflow: Workflow,
    snapshot: SnapshotStore,
    history: HistoryLog,
}

impl RepairService {
    /// Open the service rooted at `data_dir`, restoring the previous
    /// snapshot when one exists.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let snapshot = SnapshotStore::new(data_dir.join(SNAPSHOT_FILE));
        let history = HistoryLog::new(data_dir.join(HISTORY_FILE));
        let workflow = snapshot.load();
        tracing::debug!(devices = workflow.device_count(), "workflow restored");
        Self {
            workflow,
            snapshot,
            history,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Head of the given stage queue, without dequeuing it.
    pub fn next_in(&self, stage: Stage) -> Option<&Device> {
        self.workflow.queue(stage).peek()
    }

    pub fn find_device(&self, id: &str) -> Option<&Device> {
        self.workflow.find_by_identifier(id)
    }

    pub fn list_by_stage(&self) -> impl Iterator<Item = (Stage, &StageQueue)> {
        self.workflow.list_by_stage()
    }

    pub fn admit(&mut self, device: Device) -> Result<(), WorkflowError> {
        let admitted = self.workflow.admit(device)?;
        self.history.append(admitted)?;
        self.snapshot.save(&self.workflow)
    }

    pub fn advance_from_received(
        &mut self,
        analysis: &str,
        requires_repair: bool,
    ) -> Result<(), WorkflowError> {
        let device = self.workflow.advance_from_received(analysis, requires_repair)?;
        self.history.append(device)?;
        self.snapshot.save(&self.workflow)
    }

    pub fn advance_from_repair(
        &mut self,
        repair: &str,
        technician: &str,
    ) -> Result<(), WorkflowError> {
        let device = self.workflow.advance_from_repair(repair, technician)?;
        self.history.append(device)?;
        self.snapshot.save(&self.workflow)
    }

    pub fn advance_from_quality(&mut self, approved: bool) -> Result<(), WorkflowError> {
        let device = self.workflow.advance_from_quality(approved)?;
        self.history.append(device)?;
        self.snapshot.save(&self.workflow)
    }

    /// Deliver the next ready device. Returns the released device on a
    /// confirmed delivery; a cancelled one goes back to the queue tail
    /// and leaves no ledger record.
    pub fn deliver(&mut self, confirmed: bool) -> Result<Option<Device>, WorkflowError> {
        match self.workflow.deliver(confirmed)? {
            Delivery::Completed(device) => {
                self.history.append(&device)?;
                self.snapshot.save(&self.workflow)?;
                Ok(Some(device))
            }
            Delivery::Returned => {
                self.snapshot.save(&self.workflow)?;
                Ok(None)
            }
        }
    }

    /// Remove a device from active tracking. Deletions leave no trace
    /// in the ledger; only the next snapshot reflects them.
    pub fn delete_by_identifier(&mut self, id: &str) -> Result<Device, WorkflowError> {
        let removed = self.workflow.delete_by_identifier(id)?;
        self.snapshot.save(&self.workflow)?;
        Ok(removed)
    }

    pub fn read_history(&self) -> String {
        self.history.read_all()
    }

    /// Rewrite the snapshot without mutating anything (shutdown path).
    pub fn save(&self) -> Result<(), WorkflowError> {
        self.snapshot.save(&self.workflow)
    }
}
