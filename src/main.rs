//! Sleep Scheduler - put the host to sleep or hibernation after a countdown
//!
//! This is the main entry point for the sleep-scheduler application.

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use sleep_scheduler::{
    config::Config,
    services::{DryRunInvoker, PowerActionInvoker, SystemPowerInvoker},
    settings,
    state::{ScheduleController, ScheduleEvent, SchedulerOptions},
    utils::{describe_event, interrupt_signals},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sleep_scheduler={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting sleep-scheduler v{}", env!("CARGO_PKG_VERSION"));

    let saved = match settings::load(&config.settings) {
        Ok(saved) => saved,
        Err(e) => {
            warn!("{:#}", e);
            None
        }
    };

    let invoker: Arc<dyn PowerActionInvoker> = if config.dry_run {
        info!("Dry run enabled, the host will not be suspended");
        Arc::new(DryRunInvoker)
    } else {
        let system = SystemPowerInvoker::detect();
        if let Err(e) = system.check_available().await {
            warn!("Power backend check failed on {}: {}", system.platform().name(), e);
        }
        Arc::new(system)
    };

    let controller = ScheduleController::new(invoker, SchedulerOptions::default().with_defaults(saved));
    let Some(request) = config.request(controller.last_used().as_ref()) else {
        anyhow::bail!("No duration given and no saved settings found; pass --duration <seconds>");
    };

    // Handlers go in before arming so an early Ctrl-C becomes a cancel
    let mut interrupts = interrupt_signals()?;
    let mut events = controller.subscribe();
    controller.arm(request)?;

    // Persist the pair that was actually armed
    if let Some(last_used) = controller.last_used() {
        if let Err(e) = settings::save(&config.settings, &last_used) {
            warn!("{:#}", e);
        }
    }

    info!("Press Ctrl-C to cancel");

    let outcome = loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => {
                    render(&config, &event)?;
                    if event.is_terminal() {
                        break event;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Display fell behind, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => {
                    anyhow::bail!("Scheduler stopped without reporting an outcome");
                }
            },

            Some(signal) = interrupts.recv() => {
                info!("Received signal: {}", signal);
                if let Err(e) = controller.cancel() {
                    warn!("Could not cancel: {}", e);
                }
            }
        }
    };

    if let ScheduleEvent::FireFailed { error, .. } = outcome {
        error!("Scheduled action failed: {}", error);
        std::process::exit(1);
    }

    Ok(())
}

fn render(config: &Config, event: &ScheduleEvent) -> anyhow::Result<()> {
    if config.json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        info!("{}", describe_event(event));
    }
    Ok(())
}
