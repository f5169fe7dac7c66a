//! Completion notifiers

use notify_rust::Notification;
use tracing::{info, warn};

use crate::{engine::NotifySink, state::TimerMode};

/// Message shown when a run of `finished` ends and `next` is up
pub fn completion_message(finished: TimerMode, next: TimerMode) -> String {
    match finished {
        TimerMode::Work => format!("Work session complete! Time for a {}.", next.label().to_lowercase()),
        TimerMode::ShortBreak | TimerMode::LongBreak => {
            format!("{} is over! Back to {}.", finished.label(), next.label().to_lowercase())
        }
    }
}

/// Writes start and completion events to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotifySink for LogNotifier {
    fn started(&mut self, mode: TimerMode) -> anyhow::Result<()> {
        info!("{} started", mode.label());
        Ok(())
    }

    fn completed(&mut self, finished: TimerMode, next: TimerMode) -> anyhow::Result<()> {
        info!("🔔 {}", completion_message(finished, next));
        Ok(())
    }
}

/// Pops a desktop notification when a run completes
#[derive(Debug)]
pub struct DesktopNotifier {
    summary: String,
}

impl DesktopNotifier {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("Pomodoro Flow")
    }
}

impl NotifySink for DesktopNotifier {
    fn completed(&mut self, finished: TimerMode, next: TimerMode) -> anyhow::Result<()> {
        Notification::new()
            .summary(&self.summary)
            .body(&completion_message(finished, next))
            .timeout(0) // No auto-dismiss
            .show()?;
        Ok(())
    }
}

/// Fans notifications out to several sinks; one failing sink does not stop the others
#[derive(Default)]
pub struct NotifierSet {
    sinks: Vec<Box<dyn NotifySink>>,
}

impl NotifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Box<dyn NotifySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl NotifySink for NotifierSet {
    fn started(&mut self, mode: TimerMode) -> anyhow::Result<()> {
        for sink in &mut self.sinks {
            if let Err(e) = sink.started(mode) {
                warn!("Start notifier failed: {}", e);
            }
        }
        Ok(())
    }

    fn completed(&mut self, finished: TimerMode, next: TimerMode) -> anyhow::Result<()> {
        for sink in &mut self.sinks {
            if let Err(e) = sink.completed(finished, next) {
                warn!("Completion notifier failed: {}", e);
            }
        }
        Ok(())
    }
}
