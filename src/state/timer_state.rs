//! Timer state structure and management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimerMode;

/// Countdown state owned by the timer engine
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub running: bool,
    pub mode: TimerMode,
    /// Duration of the active run in seconds, fixed when the mode is set
    pub total_duration: u64,
    pub remaining: u64,
    /// Wall-clock instant at which the run reaches zero, only set while running
    pub end_timestamp: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create a paused timer for `mode` with a full countdown of `duration` seconds
    pub fn new(mode: TimerMode, duration: u64) -> Self {
        Self {
            running: false,
            mode,
            total_duration: duration,
            remaining: duration,
            end_timestamp: None,
        }
    }

    /// Seconds left at `now` according to the deadline, rounded to the nearest second.
    ///
    /// Returns `None` when no deadline is set.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<u64> {
        let end = self.end_timestamp?;
        let millis = (end - now).num_milliseconds();
        if millis <= 0 {
            return Some(0);
        }
        let seconds = ((millis + 500) / 1000) as u64;
        Some(seconds.min(self.total_duration))
    }

    /// Remaining time formatted as `MM:SS`
    pub fn display_string(&self) -> String {
        format_time(self.remaining)
    }

    /// Fraction of the run already elapsed, in `[0, 1]`
    pub fn progress_fraction(&self) -> f64 {
        if self.total_duration == 0 {
            return 1.0;
        }
        let remaining = self.remaining.min(self.total_duration) as f64;
        1.0 - remaining / self.total_duration as f64
    }

    /// Read-only view handed to the presentation layer
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            running: self.running,
            mode: self.mode,
            total_duration: self.total_duration,
            remaining: self.remaining,
            end_timestamp: self.end_timestamp,
            display: self.display_string(),
            progress: self.progress_fraction(),
            color: self.mode.color().to_string(),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerMode::Work, TimerMode::Work.nominal_duration())
    }
}

/// Snapshot of the timer as seen by render sinks and API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub running: bool,
    pub mode: TimerMode,
    pub total_duration: u64,
    pub remaining: u64,
    pub end_timestamp: Option<DateTime<Utc>>,
    pub display: String,
    pub progress: f64,
    pub color: String,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        TimerState::default().snapshot()
    }
}

/// Format seconds as zero-padded `MM:SS`; minutes keep growing past 59
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
