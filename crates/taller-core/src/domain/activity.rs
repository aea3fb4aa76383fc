//! Activity records: the per-device audit trail.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Stage;

/// One thing that happened to a device.
///
/// Immutable once created. The log a device carries is strictly
/// append-only: records are never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    date: NaiveDate,
    description: String,
    stage: Stage,
}

impl ActivityRecord {
    pub fn new(date: NaiveDate, description: impl Into<String>, stage: Stage) -> Self {
        Self {
            date,
            description: description.into(),
            stage,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl fmt::Display for ActivityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "📅 {} - [{}] {}", self.date, self.stage, self.description)
    }
}
