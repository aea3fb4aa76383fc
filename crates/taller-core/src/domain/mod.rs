//! Domain model (stages, activity records, devices, errors).

pub mod activity;
pub mod device;
pub mod errors;
pub mod stage;

pub use activity::ActivityRecord;
pub use device::Device;
pub use errors::WorkflowError;
pub use stage::Stage;
