//! Tokio-backed scheduler for engine callbacks

use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{interval, sleep, MissedTickBehavior},
};
use tracing::trace;

use super::timer_service::TimerCommand;
use crate::engine::{RunId, ScheduledTask, Scheduler};

/// Turns tick and deadline registrations into spawned tasks that post
/// commands back to the timer service.
///
/// The spawned tasks never touch engine state themselves.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    commands: mpsc::UnboundedSender<TimerCommand>,
}

impl TokioScheduler {
    pub fn new(commands: mpsc::UnboundedSender<TimerCommand>) -> Self {
        Self { commands }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_tick(&mut self, period: Duration) -> Box<dyn ScheduledTask> {
        let commands = self.commands.clone();
        let task = tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately
            ticks.tick().await;

            loop {
                ticks.tick().await;
                trace!("Reconciliation tick");
                if commands.send(TimerCommand::Tick).is_err() {
                    break;
                }
            }
        });
        Box::new(task)
    }

    fn schedule_deadline(&mut self, run: RunId, after: Duration) -> Box<dyn ScheduledTask> {
        let commands = self.commands.clone();
        let task = tokio::spawn(async move {
            sleep(after).await;
            trace!("Deadline elapsed for {}", run);
            let _ = commands.send(TimerCommand::Deadline(run));
        });
        Box::new(task)
    }
}
