//! taller-core
//!
//! Workflow engine for a computer-repair service desk. Devices enter
//! a fixed five-stage pipeline (reception, evaluation, repair, quality
//! check, delivery) and every transition is both snapshotted and
//! written to a permanent ledger.
//!
//! Module map:
//! - **domain**: stages, activity records, the device record, errors
//! - **queue**: `StageQueue`, the per-stage FIFO
//! - **workflow**: the pure in-memory state machine
//! - **store**: `SnapshotStore` (overwrite blob) and `HistoryLog`
//!   (append-only ledger)
//! - **service**: `RepairService`, the workflow wired to both stores

pub mod domain;
pub mod queue;
pub mod service;
pub mod store;
pub mod workflow;

pub use domain::{ActivityRecord, Device, Stage, WorkflowError};
pub use queue::StageQueue;
pub use service::RepairService;
pub use store::{HistoryLog, SnapshotStore};
pub use workflow::{Delivery, Workflow};
