//! Timer service background task
//!
//! The service owns the engine and is the only place engine operations run.
//! API handlers, the wake-up task and the scheduler's tick/deadline tasks all
//! talk to it through one command channel, so commands are applied strictly
//! one at a time.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use super::scheduler::TokioScheduler;
use crate::{
    engine::{
        Clock, ConfirmGate, EngineSettings, ModeChange, NotifySink, PendingModeChange, RunId,
        TimerEngine, Transition,
    },
    services::SnapshotPublisher,
    state::{TimerMode, TimerSnapshot},
};

/// Errors seen by callers of a [`TimerHandle`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("timer service is not running")]
    Closed,
    #[error("timer service dropped the request without replying")]
    NoReply,
}

/// Commands processed by the timer service
pub enum TimerCommand {
    Start(oneshot::Sender<Transition>),
    Pause(oneshot::Sender<Transition>),
    Toggle(oneshot::Sender<Transition>),
    Reset(oneshot::Sender<Transition>),
    SetMode {
        mode: TimerMode,
        gate: Box<dyn ConfirmGate>,
        reply: oneshot::Sender<ModeChange>,
    },
    /// Host regained the foreground (or woke up); recompute from the deadline
    Reconcile,
    Snapshot(oneshot::Sender<TimerSnapshot>),
    Shutdown,
    /// Periodic reconciliation tick
    Tick,
    /// Single-shot deadline of a run
    Deadline(RunId),
    /// Answer of a confirmation gate for a pending mode change
    ModeDecision {
        pending: PendingModeChange,
        accepted: bool,
        reply: oneshot::Sender<ModeChange>,
    },
}

/// Owner of the timer engine
pub struct TimerService {
    engine: TimerEngine,
    commands: mpsc::UnboundedSender<TimerCommand>,
    inbox: mpsc::UnboundedReceiver<TimerCommand>,
}

impl TimerService {
    /// Create the service and a handle to control it.
    ///
    /// Snapshots are published to the handle's watch channel; nothing runs
    /// until [`TimerService::run`] is spawned.
    pub fn new(settings: EngineSettings, clock: Box<dyn Clock>) -> (Self, TimerHandle) {
        let (commands, inbox) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(commands.clone());
        let engine = TimerEngine::new(settings, clock, Box::new(scheduler));

        let (updates_tx, updates) = watch::channel(engine.snapshot());
        let engine = engine.with_render_sink(Box::new(SnapshotPublisher::new(updates_tx)));

        let handle = TimerHandle {
            commands: commands.clone(),
            updates,
        };

        (
            Self {
                engine,
                commands,
                inbox,
            },
            handle,
        )
    }

    pub fn with_notify_sink(mut self, sink: Box<dyn NotifySink>) -> Self {
        self.engine.attach_notify_sink(sink);
        self
    }

    /// Process commands until shutdown, then cancel every pending callback
    pub async fn run(mut self) {
        info!("Starting timer service");

        while let Some(command) = self.inbox.recv().await {
            match command {
                TimerCommand::Start(reply) => respond(reply, self.engine.start()),
                TimerCommand::Pause(reply) => respond(reply, self.engine.pause()),
                TimerCommand::Toggle(reply) => {
                    let outcome = if self.engine.is_running() {
                        self.engine.pause()
                    } else {
                        self.engine.start()
                    };
                    respond(reply, outcome);
                }
                TimerCommand::Reset(reply) => respond(reply, self.engine.reset()),
                TimerCommand::SetMode { mode, gate, reply } => self.request_mode(mode, gate, reply),
                TimerCommand::ModeDecision {
                    pending,
                    accepted,
                    reply,
                } => respond(reply, self.engine.confirm_mode_change(pending, accepted)),
                TimerCommand::Reconcile => {
                    debug!("Reconciling timer on host request");
                    self.engine.reconcile_now();
                }
                TimerCommand::Tick => {
                    self.engine.reconcile_now();
                }
                TimerCommand::Deadline(run) => {
                    self.engine.on_deadline(run);
                }
                TimerCommand::Snapshot(reply) => respond(reply, self.engine.snapshot()),
                TimerCommand::Shutdown => {
                    info!("Timer service shutting down");
                    break;
                }
            }
        }

        self.engine.dispose();
        info!("Timer service stopped");
    }

    fn request_mode(
        &mut self,
        mode: TimerMode,
        gate: Box<dyn ConfirmGate>,
        reply: oneshot::Sender<ModeChange>,
    ) {
        match self.engine.set_mode(mode) {
            ModeChange::ConfirmationRequired(pending) => {
                // The gate may take a while; keep serving ticks meanwhile and
                // apply its answer as a regular command.
                let decision = gate.confirm(pending.current, pending.requested);
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let accepted = decision.await;
                    let _ = commands.send(TimerCommand::ModeDecision {
                        pending,
                        accepted,
                        reply,
                    });
                });
            }
            outcome => respond(reply, outcome),
        }
    }
}

fn respond<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("Caller went away before the timer service replied");
    }
}

/// Cloneable control handle for the timer service
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<TimerCommand>,
    updates: watch::Receiver<TimerSnapshot>,
}

impl TimerHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> TimerCommand,
    ) -> Result<T, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| ServiceError::Closed)?;
        response.await.map_err(|_| ServiceError::NoReply)
    }

    fn post(&self, command: TimerCommand) -> Result<(), ServiceError> {
        self.commands.send(command).map_err(|_| ServiceError::Closed)
    }

    pub async fn start(&self) -> Result<Transition, ServiceError> {
        self.request(TimerCommand::Start).await
    }

    pub async fn pause(&self) -> Result<Transition, ServiceError> {
        self.request(TimerCommand::Pause).await
    }

    /// Start when paused, pause when running
    pub async fn toggle(&self) -> Result<Transition, ServiceError> {
        self.request(TimerCommand::Toggle).await
    }

    pub async fn reset(&self) -> Result<Transition, ServiceError> {
        self.request(TimerCommand::Reset).await
    }

    /// Switch mode; `gate` is consulted only if a run would be discarded
    pub async fn set_mode<G>(&self, mode: TimerMode, gate: G) -> Result<ModeChange, ServiceError>
    where
        G: ConfirmGate + 'static,
    {
        self.request(|reply| TimerCommand::SetMode {
            mode,
            gate: Box::new(gate),
            reply,
        })
        .await
    }

    /// Ask the service to recompute remaining time from the deadline
    pub fn reconcile(&self) -> Result<(), ServiceError> {
        self.post(TimerCommand::Reconcile)
    }

    /// Current state straight from the engine
    pub async fn snapshot(&self) -> Result<TimerSnapshot, ServiceError> {
        self.request(TimerCommand::Snapshot).await
    }

    /// Most recently published snapshot, without a round trip
    pub fn latest(&self) -> TimerSnapshot {
        self.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.updates.clone()
    }

    pub fn shutdown(&self) -> Result<(), ServiceError> {
        self.post(TimerCommand::Shutdown)
    }
}
