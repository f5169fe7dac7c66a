//! Timer engine module
//!
//! The countdown state machine together with the seams it needs from its
//! host: a clock, a scheduler for callbacks, and render/notify sinks.

pub mod clock;
pub mod scheduler;
pub mod sinks;
pub mod timer_engine;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{RunId, ScheduledTask, Scheduler};
pub use sinks::{ConfirmGate, NotifySink, RenderSink};
pub use timer_engine::{
    EngineSettings, ModeChange, PendingModeChange, TimerEngine, Transition, DEFAULT_TICK_INTERVAL,
};
