//! Human-readable rendering of countdown state

use crate::state::ScheduleEvent;

/// Render seconds as `MM:SS`; minutes keep growing past an hour
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One-line status text for an event
pub fn describe_event(event: &ScheduleEvent) -> String {
    match event {
        ScheduleEvent::Progress { remaining_seconds, .. } => {
            format!("{} remaining", format_remaining(*remaining_seconds))
        }
        ScheduleEvent::Fired { action } => format!("Action executed: {}", action),
        ScheduleEvent::FireFailed { action, error } => format!("Could not {}: {}", action, error),
        ScheduleEvent::Cancelled { remaining_seconds_at_cancel } => format!(
            "Action cancelled with {} left",
            format_remaining(*remaining_seconds_at_cancel)
        ),
    }
}
