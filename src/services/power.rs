//! Power action capability

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{InvokeError, ScheduleError};

/// One of the two host power transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    #[default]
    Sleep,
    Hibernate,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Sleep => "sleep",
            PowerAction::Hibernate => "hibernate",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sleep" => Ok(PowerAction::Sleep),
            "hibernate" => Ok(PowerAction::Hibernate),
            _ => Err(ScheduleError::UnknownAction(s.to_string())),
        }
    }
}

/// Performs an irreversible host power transition.
///
/// Implementations issue exactly one underlying call per `invoke` and never
/// retry. A successful call may suspend the calling process, so callers must
/// not rely on anything running afterwards.
#[async_trait]
pub trait PowerActionInvoker: Send + Sync {
    async fn invoke(&self, action: PowerAction) -> Result<(), InvokeError>;
}

/// Invoker that only logs the action, for hosts where suspending is not wanted
#[derive(Debug, Clone, Default)]
pub struct DryRunInvoker;

#[async_trait]
impl PowerActionInvoker for DryRunInvoker {
    async fn invoke(&self, action: PowerAction) -> Result<(), InvokeError> {
        info!("Dry run: would {} the host now", action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_names_case_insensitively() {
        assert_eq!("sleep".parse::<PowerAction>(), Ok(PowerAction::Sleep));
        assert_eq!(" Hibernate ".parse::<PowerAction>(), Ok(PowerAction::Hibernate));
        assert_eq!(
            "shutdown".parse::<PowerAction>(),
            Err(ScheduleError::UnknownAction("shutdown".to_string()))
        );
    }

    #[test]
    fn sleep_is_the_default_action() {
        assert_eq!(PowerAction::default(), PowerAction::Sleep);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PowerAction::Hibernate).unwrap(), "\"hibernate\"");
    }

    #[tokio::test]
    async fn dry_run_always_succeeds() {
        assert!(DryRunInvoker.invoke(PowerAction::Sleep).await.is_ok());
        assert!(DryRunInvoker.invoke(PowerAction::Hibernate).await.is_ok());
    }
}
