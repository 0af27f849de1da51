//! Arm request

use serde::{Deserialize, Serialize};

use crate::{error::ScheduleError, services::PowerAction};

/// What to do and after how long. Built once per arm call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub duration_seconds: i64,
    pub action: PowerAction,
}

impl ScheduleRequest {
    pub fn new(duration_seconds: i64, action: PowerAction) -> Self {
        Self { duration_seconds, action }
    }

    /// Build a request from the presentation layer's action name
    pub fn from_named(duration_seconds: i64, action: &str) -> Result<Self, ScheduleError> {
        Ok(Self::new(duration_seconds, action.parse()?))
    }

    /// Duration as an unsigned count, rejecting negative values
    pub fn validated_duration(&self) -> Result<u64, ScheduleError> {
        u64::try_from(self.duration_seconds).map_err(|_| ScheduleError::InvalidDuration(self.duration_seconds))
    }
}
