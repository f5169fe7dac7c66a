//! Background tasks module
//!
//! This module contains the timer service and the tasks that run alongside it.

pub mod scheduler;
pub mod timer_service;
pub mod wake_up_recovery;

// Re-export main types
pub use scheduler::TokioScheduler;
pub use timer_service::{ServiceError, TimerCommand, TimerHandle, TimerService};
pub use wake_up_recovery::{suspension_gap, wake_up_recovery_task};
