//! Signal handling for interactive cancellation

#[cfg(unix)]
use futures::stream::StreamExt;

/// Interrupt requests from the terminal, registered as soon as this is built.
///
/// On unix this listens for SIGINT and SIGTERM; on Windows for Ctrl-C.
pub struct InterruptSignals {
    #[cfg(unix)]
    signals: signal_hook_tokio::Signals,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl InterruptSignals {
    /// Wait for the next interrupt and return its name.
    ///
    /// Returns `None` once the source is closed.
    pub async fn recv(&mut self) -> Option<&'static str> {
        #[cfg(unix)]
        {
            self.signals.next().await.map(signal_name)
        }
        #[cfg(windows)]
        {
            self.ctrl_c.recv().await.map(|()| "CTRL_C")
        }
    }
}

/// Register the interrupt handlers for this platform
#[cfg(unix)]
pub fn interrupt_signals() -> std::io::Result<InterruptSignals> {
    let signals = signal_hook_tokio::Signals::new([signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT])?;
    Ok(InterruptSignals { signals })
}

/// Register the interrupt handlers for this platform
#[cfg(windows)]
pub fn interrupt_signals() -> std::io::Result<InterruptSignals> {
    let ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(InterruptSignals { ctrl_c })
}

#[cfg(unix)]
fn signal_name(signal: i32) -> &'static str {
    match signal {
        signal_hook::consts::SIGINT => "SIGINT",
        signal_hook::consts::SIGTERM => "SIGTERM",
        _ => "signal",
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn names_the_handled_signals() {
        assert_eq!(signal_name(signal_hook::consts::SIGINT), "SIGINT");
        assert_eq!(signal_name(signal_hook::consts::SIGTERM), "SIGTERM");
    }

    #[tokio::test]
    async fn sigterm_is_delivered_instead_of_terminating() {
        let mut interrupts = interrupt_signals().unwrap();
        signal_hook::low_level::raise(signal_hook::consts::SIGTERM).unwrap();

        let received = tokio::time::timeout(Duration::from_secs(5), interrupts.recv())
            .await
            .unwrap();
        assert_eq!(received, Some("SIGTERM"));
    }
}
