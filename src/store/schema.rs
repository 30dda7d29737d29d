use serde::{Deserialize, Serialize};

use crate::engine::tracker::{StreakTracker, TrackerEvent};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    #[serde(flatten)]
    pub tracker: StreakTracker,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tracker: StreakTracker::default(),
        }
    }
}

impl ProfileData {
    pub fn new(tracker: StreakTracker) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tracker,
        }
    }

    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    #[serde(default)]
    pub events: Vec<TrackerEvent>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            events: Vec::new(),
        }
    }
}
