//! Pomodoro Flow - A background-resilient Pomodoro timer
//!
//! The countdown is driven by an absolute deadline instead of counted ticks,
//! so it stays correct when periodic callbacks are throttled or the host is
//! suspended. The daemon exposes the timer over HTTP for widgets to render.

pub mod api;
pub mod config;
pub mod engine;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{EngineSettings, ModeChange, TimerEngine, Transition};
pub use state::{AppState, TimerMode, TimerSnapshot, TimerState};
pub use tasks::{TimerHandle, TimerService};
pub use utils::signals::shutdown_signal;
