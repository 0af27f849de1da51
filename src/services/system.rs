//! Host power transitions through the platform's own commands

use std::io;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::power::{PowerAction, PowerActionInvoker};
use crate::error::InvokeError;

/// Host families with a known way to suspend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl HostPlatform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_os = "linux") {
            HostPlatform::Linux
        } else if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Other
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "windows",
            HostPlatform::Linux => "linux",
            HostPlatform::MacOs => "macos",
            HostPlatform::Other => std::env::consts::OS,
        }
    }
}

/// A single program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl PowerCommand {
    /// Command that performs `action` on `platform`, if there is one
    pub fn for_action(platform: HostPlatform, action: PowerAction) -> Option<Self> {
        let command = match (platform, action) {
            (HostPlatform::Windows, PowerAction::Sleep) => {
                Self::new("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"])
            }
            (HostPlatform::Windows, PowerAction::Hibernate) => Self::new("shutdown", &["/h"]),
            (HostPlatform::Linux, PowerAction::Sleep) => Self::new("systemctl", &["suspend"]),
            (HostPlatform::Linux, PowerAction::Hibernate) => Self::new("systemctl", &["hibernate"]),
            (HostPlatform::MacOs, PowerAction::Sleep) => Self::new("pmset", &["sleepnow"]),
            (HostPlatform::MacOs, PowerAction::Hibernate) | (HostPlatform::Other, _) => return None,
        };
        Some(command)
    }

    /// Command used to probe that the backend exists
    pub fn probe(platform: HostPlatform) -> Option<Self> {
        match platform {
            HostPlatform::Linux => Some(Self::new("systemctl", &["--version"])),
            HostPlatform::MacOs => Some(Self::new("pmset", &["-g"])),
            HostPlatform::Windows => Some(Self::new("powercfg", &["/a"])),
            HostPlatform::Other => None,
        }
    }

    const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }
}

/// Invoker that shells out to the host's power command
#[derive(Debug, Clone)]
pub struct SystemPowerInvoker {
    platform: HostPlatform,
}

impl SystemPowerInvoker {
    pub fn new(platform: HostPlatform) -> Self {
        Self { platform }
    }

    /// Invoker for the platform this binary was built for
    pub fn detect() -> Self {
        Self::new(HostPlatform::current())
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    /// Check that the power backend can be reached on this host
    pub async fn check_available(&self) -> Result<(), InvokeError> {
        let probe = PowerCommand::probe(self.platform).ok_or_else(|| self.unsupported())?;

        Command::new(probe.program)
            .args(probe.args)
            .output()
            .await
            .map_err(|e| spawn_error(self.platform, probe.program, e))?;

        info!("{} is available", probe.program);
        Ok(())
    }

    fn unsupported(&self) -> InvokeError {
        InvokeError::UnsupportedOnPlatform {
            platform: self.platform.name().to_string(),
        }
    }
}

#[async_trait]
impl PowerActionInvoker for SystemPowerInvoker {
    async fn invoke(&self, action: PowerAction) -> Result<(), InvokeError> {
        let command = PowerCommand::for_action(self.platform, action).ok_or_else(|| self.unsupported())?;
        info!("Executing {}: {} {}", action, command.program, command.args.join(" "));

        let output = Command::new(command.program)
            .args(command.args)
            .output()
            .await
            .map_err(|e| spawn_error(self.platform, command.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("{} failed: {}", command.program, stderr);
            return Err(classify_failure(output.status.code(), stderr));
        }

        debug!("{} command returned", action);
        Ok(())
    }
}

fn spawn_error(platform: HostPlatform, program: &str, err: io::Error) -> InvokeError {
    match err.kind() {
        io::ErrorKind::NotFound => {
            warn!("{} is not installed", program);
            InvokeError::UnsupportedOnPlatform {
                platform: platform.name().to_string(),
            }
        }
        io::ErrorKind::PermissionDenied => InvokeError::PermissionDenied,
        _ => InvokeError::UnderlyingCommandFailed {
            code: None,
            message: format!("Failed to execute {}: {}", program, err),
        },
    }
}

/// Map a non-zero exit into the error taxonomy
fn classify_failure(code: Option<i32>, stderr: String) -> InvokeError {
    const DENIED: [&str; 5] = [
        "access denied",
        "access is denied",
        "permission denied",
        "not authorized",
        "interactive authentication required",
    ];

    let lowered = stderr.to_lowercase();
    if DENIED.iter().any(|needle| lowered.contains(needle)) {
        InvokeError::PermissionDenied
    } else {
        InvokeError::UnderlyingCommandFailed { code, message: stderr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_uses_powrprof_and_shutdown() {
        let sleep = PowerCommand::for_action(HostPlatform::Windows, PowerAction::Sleep).unwrap();
        assert_eq!(sleep.program, "rundll32.exe");
        assert_eq!(sleep.args, &["powrprof.dll,SetSuspendState", "0,1,0"]);

        let hibernate = PowerCommand::for_action(HostPlatform::Windows, PowerAction::Hibernate).unwrap();
        assert_eq!(hibernate.program, "shutdown");
        assert_eq!(hibernate.args, &["/h"]);
    }

    #[test]
    fn linux_goes_through_systemctl() {
        let hibernate = PowerCommand::for_action(HostPlatform::Linux, PowerAction::Hibernate).unwrap();
        assert_eq!(hibernate.program, "systemctl");
        assert_eq!(hibernate.args, &["hibernate"]);
    }

    #[test]
    fn missing_commands_are_unsupported() {
        assert!(PowerCommand::for_action(HostPlatform::MacOs, PowerAction::Hibernate).is_none());
        assert!(PowerCommand::for_action(HostPlatform::Other, PowerAction::Sleep).is_none());
    }

    #[tokio::test]
    async fn unsupported_platform_fails_without_running_anything() {
        let invoker = SystemPowerInvoker::new(HostPlatform::Other);
        let err = invoker.invoke(PowerAction::Sleep).await.unwrap_err();
        assert!(matches!(err, InvokeError::UnsupportedOnPlatform { .. }));
    }

    #[test]
    fn polkit_rejection_is_permission_denied() {
        let err = classify_failure(
            Some(1),
            "Failed to hibernate system via logind: Interactive authentication required.".into(),
        );
        assert_eq!(err, InvokeError::PermissionDenied);
    }

    #[test]
    fn other_failures_keep_exit_code() {
        let err = classify_failure(Some(4), "Sleep verb not supported".into());
        assert_eq!(
            err,
            InvokeError::UnderlyingCommandFailed {
                code: Some(4),
                message: "Sleep verb not supported".into(),
            }
        );
    }

    #[test]
    fn missing_binary_maps_to_unsupported() {
        let err = spawn_error(HostPlatform::Linux, "systemctl", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(
            err,
            InvokeError::UnsupportedOnPlatform { platform: "linux".into() }
        );
    }
}
