//! Stage-bound FIFO queues.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::{Device, Stage, WorkflowError};

/// FIFO queue of devices parked at one pipeline stage.
///
/// Design:
/// - Enqueueing stamps the device with the queue's stage, so
///   `Device::current_stage` always matches the queue holding it.
/// - A device is owned by exactly one queue at a time; moving it
///   between stages is a transfer of ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageQueue {
    stage: Stage,
    devices: VecDeque<Device>,
}

impl StageQueue {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            devices: VecDeque::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Add a device at the tail, taking over its stage.
    pub fn enqueue(&mut self, mut device: Device) {
        device.set_stage(self.stage);
        self.devices.push_back(device);
    }

    /// Remove and return the head.
    pub fn dequeue(&mut self) -> Result<Device, WorkflowError> {
        self.devices
            .pop_front()
            .ok_or(WorkflowError::QueueEmpty(self.stage))
    }

    pub fn peek(&self) -> Option<&Device> {
        self.devices.front()
    }

    /// The most recently enqueued device.
    pub fn tail(&self) -> Option<&Device> {
        self.devices.back()
    }

    pub(crate) fn tail_mut(&mut self) -> Option<&mut Device> {
        self.devices.back_mut()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices in FIFO order, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn contains_identifier(&self, id: &str) -> bool {
        self.devices.iter().any(|d| d.matches_identifier(id))
    }

    /// Remove the first device whose identifier matches `id`,
    /// case-insensitively, wherever it sits in the queue.
    pub fn remove_by_identifier(&mut self, id: &str) -> Result<Device, WorkflowError> {
        match self.devices.iter().position(|d| d.matches_identifier(id)) {
            Some(index) => Ok(self
                .devices
                .remove(index)
                .expect("position came from this deque")),
            None => Err(WorkflowError::NotFound(id.to_string())),
        }
    }
}
