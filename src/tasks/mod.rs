//! Background tasks module
//! 
//! This module contains the countdown driver spawned for each armed schedule.

pub mod countdown;

// Re-export main functions
pub(crate) use countdown::countdown_task;
