//! Deadline-reconciled countdown engine
//!
//! Remaining time is always derived from the absolute `end_timestamp` and
//! the clock. Periodic ticks and wake-ups only trigger a recomputation, so
//! throttled or suspended callbacks delay the display but never skew it.
//! A single-shot deadline callback completes the run even if no tick fires.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, trace, warn};

use super::{Clock, NotifySink, RenderSink, RunId, ScheduledTask, Scheduler};
use crate::state::{ModeDurations, TimerMode, TimerSnapshot, TimerState};

/// Reconciliation period, kept under a second so a corrected display never skips a digit
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(900);

/// Shortest accepted reconciliation period
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Startup configuration of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub durations: ModeDurations,
    pub tick_interval: Duration,
}

impl EngineSettings {
    /// Clamp durations to `1..=MAX_DURATION_SECONDS` and floor the tick period
    pub fn sanitized(self) -> Self {
        let sanitized = Self {
            durations: self.durations.clamped(),
            tick_interval: self.tick_interval.max(MIN_TICK_INTERVAL),
        };
        if sanitized != self {
            warn!(
                "Engine settings out of range, using durations {:?} and tick {:?}",
                sanitized.durations, sanitized.tick_interval
            );
        }
        sanitized
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            durations: ModeDurations::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Outcome of start/pause/reconcile/complete.
///
/// Invalid transitions (start while running, pause while paused) are not
/// errors, they are reported as `Ignored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

/// A mode change waiting for the host's confirmation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingModeChange {
    pub current: TimerMode,
    pub requested: TimerMode,
    run: RunId,
}

/// Outcome of a mode change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Applied,
    /// Timer is running; nothing changed until `confirm_mode_change` is called
    ConfirmationRequired(PendingModeChange),
    /// The gate declined (or the confirmation went stale); nothing changed
    Rejected,
}

pub struct TimerEngine {
    state: TimerState,
    settings: EngineSettings,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
    render: Option<Box<dyn RenderSink>>,
    notify: Option<Box<dyn NotifySink>>,
    tick: Option<Box<dyn ScheduledTask>>,
    deadline: Option<Box<dyn ScheduledTask>>,
    run: RunId,
}

impl TimerEngine {
    /// Create a paused engine in work mode with a full countdown
    pub fn new(settings: EngineSettings, clock: Box<dyn Clock>, scheduler: Box<dyn Scheduler>) -> Self {
        let settings = settings.sanitized();
        let duration = settings.durations.for_mode(TimerMode::Work);
        Self {
            state: TimerState::new(TimerMode::Work, duration),
            settings,
            clock,
            scheduler,
            render: None,
            notify: None,
            tick: None,
            deadline: None,
            run: RunId::default(),
        }
    }

    pub fn with_render_sink(mut self, sink: Box<dyn RenderSink>) -> Self {
        self.render = Some(sink);
        self
    }

    pub fn with_notify_sink(mut self, sink: Box<dyn NotifySink>) -> Self {
        self.notify = Some(sink);
        self
    }

    /// Attach a render sink, returning the previous one
    pub fn attach_render_sink(&mut self, sink: Box<dyn RenderSink>) -> Option<Box<dyn RenderSink>> {
        let previous = self.render.replace(sink);
        self.emit_display();
        previous
    }

    pub fn detach_render_sink(&mut self) -> Option<Box<dyn RenderSink>> {
        self.render.take()
    }

    pub fn attach_notify_sink(&mut self, sink: Box<dyn NotifySink>) -> Option<Box<dyn NotifySink>> {
        self.notify.replace(sink)
    }

    pub fn detach_notify_sink(&mut self) -> Option<Box<dyn NotifySink>> {
        self.notify.take()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Run currently (or most recently) armed
    pub fn run_id(&self) -> RunId {
        self.run
    }

    pub fn display_string(&self) -> String {
        self.state.display_string()
    }

    pub fn progress_fraction(&self) -> f64 {
        self.state.progress_fraction()
    }

    pub fn mode_color(&self) -> &'static str {
        self.state.mode.color()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start counting down from the current remaining time
    pub fn start(&mut self) -> Transition {
        if self.state.running {
            debug!("Start ignored, timer already running");
            return Transition::Ignored;
        }

        if self.state.remaining == 0 {
            self.state.remaining = self.state.total_duration;
        }

        let now = self.clock.now();
        let remaining = self.state.remaining;
        let Some(end) = deadline_after(now, remaining) else {
            warn!("Start ignored, deadline {}s after {} is out of range", remaining, now);
            return Transition::Ignored;
        };

        self.cancel_scheduled();
        self.run = self.run.next();
        self.state.running = true;
        self.state.end_timestamp = Some(end);

        self.tick = Some(self.scheduler.schedule_tick(self.settings.tick_interval));
        self.deadline = Some(
            self.scheduler
                .schedule_deadline(self.run, Duration::from_secs(remaining)),
        );

        info!(
            "Started {} timer ({}, {}s remaining)",
            self.state.mode, self.run, remaining
        );

        self.emit_run_state(true);
        self.emit_display();
        let mode = self.state.mode;
        self.notify_with("start", |sink| sink.started(mode));

        Transition::Applied
    }

    /// Stop counting down, keeping the last reconciled remaining time
    pub fn pause(&mut self) -> Transition {
        if !self.state.running {
            debug!("Pause ignored, timer not running");
            return Transition::Ignored;
        }

        let now = self.clock.now();
        if self.refresh_remaining(now) == 0 {
            debug!("Deadline already passed at pause, completing run");
            return self.complete();
        }

        self.halt();
        info!(
            "Paused {} timer with {}s remaining",
            self.state.mode, self.state.remaining
        );

        self.emit_run_state(false);
        self.emit_display();

        Transition::Applied
    }

    /// Pause and restore the full duration of the current mode
    pub fn reset(&mut self) -> Transition {
        self.pause();
        self.restore_full_duration();
        info!("Reset {} timer to {}s", self.state.mode, self.state.total_duration);
        self.emit_display();
        Transition::Applied
    }

    /// Request a switch to `mode`.
    ///
    /// A paused timer switches immediately. A running one needs the host to
    /// confirm discarding the active run through `confirm_mode_change`.
    pub fn set_mode(&mut self, mode: TimerMode) -> ModeChange {
        if self.state.running {
            debug!(
                "Mode change {} -> {} needs confirmation, timer is running",
                self.state.mode, mode
            );
            return ModeChange::ConfirmationRequired(PendingModeChange {
                current: self.state.mode,
                requested: mode,
                run: self.run,
            });
        }

        self.apply_mode(mode);
        ModeChange::Applied
    }

    /// Resolve a pending mode change with the gate's answer
    pub fn confirm_mode_change(&mut self, pending: PendingModeChange, accepted: bool) -> ModeChange {
        if !accepted {
            info!(
                "Mode change {} -> {} rejected, keeping current run",
                pending.current, pending.requested
            );
            return ModeChange::Rejected;
        }

        if pending.run != self.run || pending.current != self.state.mode {
            warn!(
                "Confirmation for {} in {} mode is stale (active {} in {} mode), ignoring it",
                pending.run, pending.current, self.run, self.state.mode
            );
            return ModeChange::Rejected;
        }

        self.pause();
        self.apply_mode(pending.requested);
        ModeChange::Applied
    }

    /// Request a mode change, resolving confirmation with a synchronous gate
    pub fn set_mode_with<F>(&mut self, mode: TimerMode, gate: F) -> ModeChange
    where
        F: FnOnce(TimerMode, TimerMode) -> bool,
    {
        match self.set_mode(mode) {
            ModeChange::ConfirmationRequired(pending) => {
                let accepted = gate(pending.current, pending.requested);
                self.confirm_mode_change(pending, accepted)
            }
            outcome => outcome,
        }
    }

    /// Recompute remaining time from the deadline, completing the run at zero
    pub fn reconcile(&mut self, now: DateTime<Utc>) -> Transition {
        if !self.state.running {
            return Transition::Ignored;
        }

        let remaining = self.refresh_remaining(now);
        trace!("Reconciled {} timer: {}s remaining", self.state.mode, remaining);
        self.emit_display();

        if remaining == 0 {
            self.complete();
        }

        Transition::Applied
    }

    /// Reconcile against the engine's own clock
    pub fn reconcile_now(&mut self) -> Transition {
        let now = self.clock.now();
        self.reconcile(now)
    }

    /// Deadline callback for `run`; completes the run if it is still the active one
    pub fn on_deadline(&mut self, run: RunId) -> Transition {
        if run != self.run || !self.state.running {
            debug!("Ignoring deadline of {}, active run is {}", run, self.run);
            return Transition::Ignored;
        }

        debug!("Deadline reached for {}", run);
        self.complete()
    }

    /// Finish the active run and advance to the next mode.
    ///
    /// Both the tick and the deadline may get here for the same run; only
    /// the first call while running has any effect.
    pub fn complete(&mut self) -> Transition {
        if !self.state.running {
            debug!("Completion ignored, timer not running");
            return Transition::Ignored;
        }

        let finished = self.state.mode;
        let next = finished.next();

        self.halt();
        self.state.remaining = 0;
        info!("{} timer complete, switching to {}", finished, next);

        self.emit_run_state(false);
        self.emit_display();
        self.notify_with("completion", |sink| sink.completed(finished, next));

        self.apply_mode(next);

        Transition::Applied
    }

    /// Cancel every pending callback; the engine is left paused
    pub fn dispose(&mut self) {
        if self.state.running {
            let now = self.clock.now();
            self.refresh_remaining(now);
        }
        self.halt();
        debug!("Timer engine disposed");
    }

    fn refresh_remaining(&mut self, now: DateTime<Utc>) -> u64 {
        if let Some(remaining) = self.state.remaining_at(now) {
            self.state.remaining = remaining;
        }
        self.state.remaining
    }

    fn halt(&mut self) {
        self.cancel_scheduled();
        self.state.running = false;
        self.state.end_timestamp = None;
    }

    fn cancel_scheduled(&mut self) {
        if let Some(tick) = self.tick.take() {
            tick.cancel();
        }
        if let Some(deadline) = self.deadline.take() {
            deadline.cancel();
        }
    }

    fn restore_full_duration(&mut self) {
        let duration = self.settings.durations.for_mode(self.state.mode);
        self.state.total_duration = duration;
        self.state.remaining = duration;
        self.state.end_timestamp = None;
    }

    fn apply_mode(&mut self, mode: TimerMode) {
        self.state.mode = mode;
        self.restore_full_duration();
        info!("Mode set to {} ({}s)", mode, self.state.total_duration);

        if let Some(sink) = self.render.as_mut() {
            if let Err(e) = sink.mode_changed(mode) {
                warn!("Render sink failed to apply mode change: {}", e);
            }
        }
        self.emit_display();
    }

    fn emit_display(&mut self) {
        let snapshot = self.state.snapshot();
        match self.render.as_mut() {
            Some(sink) => {
                if let Err(e) = sink.display_updated(&snapshot) {
                    warn!("Render sink failed to update display: {}", e);
                }
            }
            None => trace!("No render sink attached, display update dropped"),
        }
    }

    fn emit_run_state(&mut self, running: bool) {
        match self.render.as_mut() {
            Some(sink) => {
                if let Err(e) = sink.run_state_changed(running) {
                    warn!("Render sink failed to update run state: {}", e);
                }
            }
            None => trace!("No render sink attached, run state change dropped"),
        }
    }

    fn notify_with<F>(&mut self, what: &str, send: F)
    where
        F: FnOnce(&mut Box<dyn NotifySink>) -> anyhow::Result<()>,
    {
        match self.notify.as_mut() {
            Some(sink) => {
                if let Err(e) = send(sink) {
                    warn!("Failed to send {} notification: {}", what, e);
                }
            }
            None => debug!("No notify sink attached, {} notification dropped", what),
        }
    }
}

fn deadline_after(now: DateTime<Utc>, secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(secs).ok()?;
    now.checked_add_signed(chrono::Duration::try_seconds(secs)?)
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.cancel_scheduled();
    }
}
