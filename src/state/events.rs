//! Notifications delivered to observers

use serde::Serialize;

use super::Phase;
use crate::{error::InvokeError, services::PowerAction};

/// Progress and terminal outcomes of a schedule, in transition order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleEvent {
    Progress { remaining_seconds: u64, phase: Phase },
    Fired { action: PowerAction },
    FireFailed { action: PowerAction, error: InvokeError },
    Cancelled { remaining_seconds_at_cancel: u64 },
}

impl ScheduleEvent {
    /// Whether this event ends the schedule
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScheduleEvent::Progress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_progress_is_non_terminal() {
        let progress = ScheduleEvent::Progress { remaining_seconds: 3, phase: Phase::Running };
        assert!(!progress.is_terminal());
        assert!(ScheduleEvent::Cancelled { remaining_seconds_at_cancel: 3 }.is_terminal());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(ScheduleEvent::FireFailed {
            action: PowerAction::Sleep,
            error: InvokeError::PermissionDenied,
        })
        .unwrap();
        assert_eq!(json["type"], "fire_failed");
        assert_eq!(json["action"], "sleep");
        assert_eq!(json["error"]["kind"], "permission_denied");
    }
}
