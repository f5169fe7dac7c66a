//! Wake-up recovery background task

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::TimerHandle;

/// Wall-clock drift tolerated before a sample counts as a wake-up
const WAKE_SLACK: Duration = Duration::from_secs(2);

/// How long the host was suspended between two samples, if at all.
///
/// The monotonic clock stops while the machine sleeps and the wall clock
/// does not, so a wall-clock lead beyond [`WAKE_SLACK`] means a suspension.
/// A wall clock that went backwards is never reported as a wake-up.
pub fn suspension_gap(wall_elapsed: chrono::Duration, monotonic_elapsed: Duration) -> Option<Duration> {
    let wall_elapsed = wall_elapsed.to_std().ok()?;
    let gap = wall_elapsed.checked_sub(monotonic_elapsed)?;
    (gap >= WAKE_SLACK).then_some(gap)
}

/// Background task that detects system wake-ups and triggers timer reconciliation
pub async fn wake_up_recovery_task(timer: TimerHandle, period: Duration) {
    info!("Starting wake-up recovery task (every {}s)", period.as_secs());

    let mut samples = interval(period);
    samples.set_missed_tick_behavior(MissedTickBehavior::Delay);
    samples.tick().await;

    let mut last_wall = Utc::now();
    let mut last_monotonic = Instant::now();

    loop {
        samples.tick().await;

        let wall = Utc::now();
        let monotonic = Instant::now();

        match suspension_gap(wall - last_wall, monotonic - last_monotonic) {
            Some(gap) => {
                info!(
                    "System wake-up detected (suspended ~{}s), reconciling timer",
                    gap.as_secs()
                );
                if let Err(e) = timer.reconcile() {
                    warn!("Failed to trigger wake-up reconciliation: {}", e);
                    break;
                }
            }
            None => debug!("No suspension since last sample"),
        }

        last_wall = wall;
        last_monotonic = monotonic;
    }

    info!("Wake-up recovery task stopped");
}
