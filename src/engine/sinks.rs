//! Capabilities the engine calls out to on its host

use futures::future::{self, BoxFuture, FutureExt};

use crate::state::{TimerMode, TimerSnapshot};

/// Presentation layer that renders the countdown
pub trait RenderSink: Send {
    /// Remaining time or progress changed
    fn display_updated(&mut self, snapshot: &TimerSnapshot) -> anyhow::Result<()>;

    /// Run/pause affordance should flip
    fn run_state_changed(&mut self, _running: bool) -> anyhow::Result<()> {
        Ok(())
    }

    /// Active mode changed, theme colors should follow
    fn mode_changed(&mut self, _mode: TimerMode) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Signals run start and completion to the user (sound, desktop notification...)
pub trait NotifySink: Send {
    fn started(&mut self, _mode: TimerMode) -> anyhow::Result<()> {
        Ok(())
    }

    fn completed(&mut self, finished: TimerMode, next: TimerMode) -> anyhow::Result<()>;
}

/// Host decision on whether a running timer may be discarded for a mode change.
///
/// The answer may arrive later; the engine never waits on it.
pub trait ConfirmGate: Send + Sync {
    fn confirm(&self, current: TimerMode, requested: TimerMode) -> BoxFuture<'static, bool>;
}

/// A pre-made answer, e.g. a `confirm` flag sent along with the request
impl ConfirmGate for bool {
    fn confirm(&self, _current: TimerMode, _requested: TimerMode) -> BoxFuture<'static, bool> {
        future::ready(*self).boxed()
    }
}
