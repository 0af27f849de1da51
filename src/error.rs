//! Error taxonomy for the scheduler and the power invoker

use serde::Serialize;
use thiserror::Error;

/// Caller-misuse errors returned synchronously from `arm`/`cancel`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid duration {0}s: must be zero or greater")]
    InvalidDuration(i64),

    #[error("a schedule is already armed")]
    AlreadyArmed,

    #[error("no schedule is armed")]
    NotArmed,

    #[error("the scheduled action is already firing")]
    AlreadyFiring,

    #[error("unknown action '{0}', expected 'sleep' or 'hibernate'")]
    UnknownAction(String),
}

/// Host failures while performing a power transition.
///
/// These never cross the countdown driver boundary as a return value; they
/// are delivered to observers inside `ScheduleEvent::FireFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvokeError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("power action not supported on {platform}")]
    UnsupportedOnPlatform { platform: String },

    #[error("power command failed (exit code {code:?}): {message}")]
    UnderlyingCommandFailed { code: Option<i32>, message: String },
}
