//! Utility functions module
//! 
//! This module contains utility functions used throughout the application.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{describe_event, format_remaining};
pub use signals::{interrupt_signals, InterruptSignals};
