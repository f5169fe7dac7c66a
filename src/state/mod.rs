//! State management module
//!
//! This module contains the timer data model and the shared application state.

pub mod app_state;
pub mod timer_mode;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_mode::{ModeDurations, TimerMode};
pub use timer_state::{format_time, TimerSnapshot, TimerState};
