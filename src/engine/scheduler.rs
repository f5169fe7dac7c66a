//! Scheduling seam between the engine and its host's timer facility

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Identifies one start-to-stop run of the timer.
///
/// Deadline callbacks carry the run they were armed for, so a callback that
/// was already in flight when its run got cancelled can be recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl RunId {
    pub fn next(self) -> RunId {
        RunId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Handle to a pending callback registration
pub trait ScheduledTask: Send {
    /// Cancel the callback; it must not fire afterwards
    fn cancel(self: Box<Self>);
}

/// Registers future work on behalf of the engine.
///
/// Implementations deliver the callbacks back to whoever owns the engine:
/// a periodic tick should end up in `TimerEngine::reconcile`, a deadline in
/// `TimerEngine::on_deadline`.
pub trait Scheduler: Send {
    /// Arm a repeating reconciliation tick every `period`
    fn schedule_tick(&mut self, period: Duration) -> Box<dyn ScheduledTask>;

    /// Arm a single-shot callback for `run`, firing once `after` has elapsed
    fn schedule_deadline(&mut self, run: RunId, after: Duration) -> Box<dyn ScheduledTask>;
}

impl ScheduledTask for tokio::task::JoinHandle<()> {
    fn cancel(self: Box<Self>) {
        self.abort();
    }
}
