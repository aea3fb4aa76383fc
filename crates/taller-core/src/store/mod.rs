//! Persistence surfaces: overwrite snapshot + append-only ledger.

mod history;
mod snapshot;

pub use history::HistoryLog;
pub use snapshot::SnapshotStore;
