//! Single-timer schedule controller

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::{broadcast, oneshot, watch};
use tracing::{debug, info, warn};

use super::{Phase, ScheduleEvent, ScheduleRequest, ScheduleState};
use crate::{
    error::{InvokeError, ScheduleError},
    services::{PowerAction, PowerActionInvoker},
    settings::ScheduleSettings,
    tasks::countdown_task,
};

const EVENT_CAPACITY: usize = 64;

/// Construction-time configuration for the controller
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Interval between countdown decrements
    pub tick: Duration,
    /// Last-used pair to pre-populate the next request with
    pub defaults: Option<ScheduleSettings>,
}

impl SchedulerOptions {
    pub fn with_defaults(mut self, defaults: Option<ScheduleSettings>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            defaults: None,
        }
    }
}

/// Owns the single schedule and its state machine.
///
/// Cloning yields another handle to the same schedule.
#[derive(Clone)]
pub struct ScheduleController {
    shared: Arc<Shared>,
}

/// State shared between the controller handles and the countdown driver
pub(crate) struct Shared {
    inner: Mutex<Inner>,
    invoker: Arc<dyn PowerActionInvoker>,
    tick: Duration,
    event_tx: broadcast::Sender<ScheduleEvent>,
    state_tx: watch::Sender<ScheduleState>,
}

struct Inner {
    state: ScheduleState,
    /// Bumped on every arm so a stale driver cannot touch a newer schedule
    generation: u64,
    cancel_tx: Option<oneshot::Sender<()>>,
    last_used: Option<ScheduleSettings>,
}

/// Result of one countdown decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Continue,
    Expired,
    Stale,
}

impl ScheduleController {
    /// Create an idle controller
    pub fn new(invoker: Arc<dyn PowerActionInvoker>, options: SchedulerOptions) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let (state_tx, _) = watch::channel(ScheduleState::idle());

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: ScheduleState::idle(),
                    generation: 0,
                    cancel_tx: None,
                    last_used: options.defaults,
                }),
                invoker,
                tick: options.tick,
                event_tx,
                state_tx,
            }),
        }
    }

    /// Arm the schedule and start the countdown driver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self, request: ScheduleRequest) -> Result<ScheduleState, ScheduleError> {
        let mut inner = self.shared.lock();
        if !inner.state.is_idle() {
            warn!("Rejecting arm: a schedule is already {:?}", inner.state.phase);
            return Err(ScheduleError::AlreadyArmed);
        }
        let duration = request.validated_duration()?;

        inner.generation += 1;
        let generation = inner.generation;
        inner.state = ScheduleState::armed(duration, request.action);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        inner.cancel_tx = Some(cancel_tx);
        inner.last_used = Some(ScheduleSettings::new(duration, request.action));

        let snapshot = inner.state.clone();
        self.shared.publish(&snapshot);
        drop(inner);

        info!("Scheduled {} in {} seconds", request.action, duration);
        tokio::spawn(countdown_task(Arc::clone(&self.shared), generation, cancel_rx));

        Ok(snapshot)
    }

    /// Arm from a duration and an action name such as `"sleep"`
    pub fn arm_named(&self, duration_seconds: i64, action: &str) -> Result<ScheduleState, ScheduleError> {
        self.arm(ScheduleRequest::from_named(duration_seconds, action)?)
    }

    /// Cancel the running countdown, returning the seconds that were left
    pub fn cancel(&self) -> Result<u64, ScheduleError> {
        let mut inner = self.shared.lock();
        match inner.state.phase {
            Phase::Running => {}
            Phase::Firing => {
                warn!("Rejecting cancel: the action is already firing");
                return Err(ScheduleError::AlreadyFiring);
            }
            Phase::Idle | Phase::Cancelled => return Err(ScheduleError::NotArmed),
        }

        let remaining = inner.state.remaining_seconds;
        if let Some(cancel_tx) = inner.cancel_tx.take() {
            // The driver may already be gone; the phase change below is what it checks
            let _ = cancel_tx.send(());
        }

        inner.state.phase = Phase::Cancelled;
        self.shared.publish(&inner.state);
        self.shared.emit(ScheduleEvent::Cancelled {
            remaining_seconds_at_cancel: remaining,
        });

        inner.state = ScheduleState::idle();
        self.shared.publish(&inner.state);

        info!("Action cancelled with {} seconds remaining", remaining);
        Ok(remaining)
    }

    /// Subscribe to progress and terminal notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ScheduleEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Watch the latest state snapshot
    pub fn watch(&self) -> watch::Receiver<ScheduleState> {
        self.shared.state_tx.subscribe()
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> ScheduleState {
        self.shared.lock().state.clone()
    }

    /// Last successfully armed pair, or the startup defaults
    pub fn last_used(&self) -> Option<ScheduleSettings> {
        self.shared.lock().last_used
    }

    /// The pre-populated request for the next arm, if any
    pub fn next_request(&self) -> Option<ScheduleRequest> {
        self.last_used().map(|settings| settings.to_request())
    }

    pub fn tick_interval(&self) -> Duration {
        self.shared.tick
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ScheduleEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("No subscribers for schedule event");
        }
    }

    fn publish(&self, state: &ScheduleState) {
        self.state_tx.send_replace(state.clone());
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        self.tick
    }

    pub(crate) fn invoker(&self) -> &dyn PowerActionInvoker {
        self.invoker.as_ref()
    }

    /// Phase of the schedule if `generation` is still the current one
    pub(crate) fn phase_for(&self, generation: u64) -> Option<Phase> {
        let inner = self.lock();
        (inner.generation == generation).then_some(inner.state.phase)
    }

    /// Decrement the countdown by one tick
    pub(crate) fn tick(&self, generation: u64) -> TickOutcome {
        let mut inner = self.lock();
        if inner.generation != generation || !inner.state.is_running() {
            return TickOutcome::Stale;
        }

        inner.state.remaining_seconds = inner.state.remaining_seconds.saturating_sub(1);
        let remaining = inner.state.remaining_seconds;
        debug!("Countdown tick: {} seconds remaining", remaining);
        self.emit(ScheduleEvent::Progress {
            remaining_seconds: remaining,
            phase: Phase::Running,
        });

        let outcome = if remaining == 0 {
            inner.state.phase = Phase::Firing;
            inner.cancel_tx = None;
            TickOutcome::Expired
        } else {
            TickOutcome::Continue
        };
        self.publish(&inner.state);
        outcome
    }

    /// Action to invoke if `generation` is the schedule currently firing
    pub(crate) fn firing_action(&self, generation: u64) -> Option<PowerAction> {
        let inner = self.lock();
        if inner.generation == generation && inner.state.phase == Phase::Firing {
            inner.state.action
        } else {
            None
        }
    }

    /// Return to idle after the invoker finished and report the outcome
    pub(crate) fn finish_fire(&self, generation: u64, result: Result<(), InvokeError>) {
        let mut inner = self.lock();
        if inner.generation != generation || inner.state.phase != Phase::Firing {
            warn!("Dropping outcome of superseded schedule {}", generation);
            return;
        }
        let Some(action) = inner.state.action else {
            return;
        };

        inner.state = ScheduleState::idle();
        self.publish(&inner.state);
        let event = match result {
            Ok(()) => ScheduleEvent::Fired { action },
            Err(error) => ScheduleEvent::FireFailed { action, error },
        };
        self.emit(event);
    }
}
