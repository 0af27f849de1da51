//! Sleep Scheduler - a one-shot countdown that suspends the host
//! 
//! This library provides the single-timer scheduler that arms, counts down,
//! cancels and finally fires a sleep or hibernate transition on the host.

pub mod config;
pub mod error;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{InvokeError, ScheduleError};
pub use services::{DryRunInvoker, PowerAction, PowerActionInvoker, SystemPowerInvoker};
pub use settings::ScheduleSettings;
pub use state::{Phase, ScheduleController, ScheduleEvent, ScheduleRequest, ScheduleState, SchedulerOptions};
