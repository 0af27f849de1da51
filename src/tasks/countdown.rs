//! Countdown driver background task

use std::sync::Arc;
use tokio::{
    sync::oneshot,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info};

use crate::state::{
    controller::{Shared, TickOutcome},
    Phase,
};

/// Drive one armed schedule until it fires, is cancelled or is superseded.
///
/// The cancel signal is polled before each tick, and every tick re-checks the
/// phase under the controller lock, so a cancel that lands first always wins.
pub(crate) async fn countdown_task(shared: Arc<Shared>, generation: u64, mut cancel_rx: oneshot::Receiver<()>) {
    let tick = shared.tick_interval();
    let mut interval = interval_at(Instant::now() + tick, tick);
    debug!("Starting countdown driver for schedule {}", generation);

    loop {
        match shared.phase_for(generation) {
            Some(Phase::Running) => {}
            Some(Phase::Firing) => break,
            _ => {
                debug!("Schedule {} is no longer running, stopping driver", generation);
                return;
            }
        }

        tokio::select! {
            biased;

            _ = &mut cancel_rx => {
                debug!("Schedule {} cancelled, stopping driver", generation);
                return;
            }

            _ = interval.tick() => {
                if shared.tick(generation) == TickOutcome::Stale {
                    return;
                }
            }
        }
    }

    fire(&shared, generation).await;
}

async fn fire(shared: &Shared, generation: u64) {
    let Some(action) = shared.firing_action(generation) else {
        return;
    };

    info!("Countdown expired, triggering {}", action);
    let result = shared.invoker().invoke(action).await;
    match &result {
        Ok(()) => info!("Action executed: {}", action),
        Err(e) => error!("Failed to {} the host: {}", action, e),
    }

    shared.finish_fire(generation, result);
}
