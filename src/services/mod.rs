//! Host power capability module
//! 
//! This module contains the power-action capability used by the scheduler
//! and the host implementations that back it.

pub mod power;
pub mod system;

// Re-export main types
pub use power::{DryRunInvoker, PowerAction, PowerActionInvoker};
pub use system::{HostPlatform, PowerCommand, SystemPowerInvoker};
