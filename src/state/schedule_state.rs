//! Live countdown state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::PowerAction;

/// Phase of the single schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Firing,
    Cancelled,
}

/// The countdown as seen by the controller.
///
/// Observers only ever receive clones of this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub action: Option<PowerAction>,
    pub started_at: Option<DateTime<Utc>>,
}

impl ScheduleState {
    /// Create an idle state with no timer
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: 0,
            total_seconds: 0,
            action: None,
            started_at: None,
        }
    }

    /// State for a freshly armed countdown; zero goes straight to firing
    pub fn armed(duration_seconds: u64, action: PowerAction) -> Self {
        Self {
            phase: if duration_seconds == 0 { Phase::Firing } else { Phase::Running },
            remaining_seconds: duration_seconds,
            total_seconds: duration_seconds,
            action: Some(action),
            started_at: Some(Utc::now()),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::idle()
    }
}
