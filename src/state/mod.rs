//! State management module
//! 
//! This module contains the schedule value types, the notifications emitted
//! while a schedule runs, and the controller that owns the state machine.

pub mod controller;
pub mod events;
pub mod request;
pub mod schedule_state;

// Re-export main types
pub use controller::{ScheduleController, SchedulerOptions};
pub use events::ScheduleEvent;
pub use request::ScheduleRequest;
pub use schedule_state::{Phase, ScheduleState};
