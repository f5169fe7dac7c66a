//! Render sink that publishes timer snapshots to watchers

use tokio::sync::watch;
use tracing::debug;

use crate::{
    engine::RenderSink,
    state::{TimerMode, TimerSnapshot},
};

/// Publishes every display update on a watch channel.
///
/// Watchers are only woken when the snapshot actually changed, so a
/// reconciliation tick that lands inside the same second is free.
#[derive(Debug)]
pub struct SnapshotPublisher {
    updates: watch::Sender<TimerSnapshot>,
}

impl SnapshotPublisher {
    pub fn new(updates: watch::Sender<TimerSnapshot>) -> Self {
        Self { updates }
    }
}

impl RenderSink for SnapshotPublisher {
    fn display_updated(&mut self, snapshot: &TimerSnapshot) -> anyhow::Result<()> {
        self.updates.send_if_modified(|current| {
            if *current == *snapshot {
                false
            } else {
                *current = snapshot.clone();
                true
            }
        });
        Ok(())
    }

    fn run_state_changed(&mut self, running: bool) -> anyhow::Result<()> {
        debug!("Run state changed: {}", if running { "running" } else { "paused" });
        Ok(())
    }

    fn mode_changed(&mut self, mode: TimerMode) -> anyhow::Result<()> {
        debug!("Mode changed to {} ({})", mode, mode.color());
        Ok(())
    }
}
