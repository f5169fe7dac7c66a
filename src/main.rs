//! Pomodoro Flow - A background-resilient Pomodoro timer daemon
//!
//! This is the main entry point for the pomodoro-flow application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use pomodoro_flow::{
    api::create_router,
    config::Config,
    engine::SystemClock,
    services::{DesktopNotifier, LogNotifier, NotifierSet},
    state::AppState,
    tasks::{wake_up_recovery_task, TimerService},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_flow={},tower_http=info", config.log_level()))
        .init();

    let settings = config.engine_settings();
    info!("Starting pomodoro-flow server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, work={}s, short break={}s, long break={}s, tick={}ms",
        config.host,
        config.port,
        settings.durations.work,
        settings.durations.short_break,
        settings.durations.long_break,
        settings.tick_interval.as_millis()
    );

    let mut notifiers = NotifierSet::new().with(Box::new(LogNotifier));
    if config.desktop_notify {
        info!("Desktop notifications enabled");
        notifiers = notifiers.with(Box::new(DesktopNotifier::default()));
    }

    // Create the timer service that owns the engine
    let (service, timer) = TimerService::new(settings, Box::new(SystemClock));
    let service = service.with_notify_sink(Box::new(notifiers));
    let service_task = tokio::spawn(service.run());

    // Reconcile the timer after the machine wakes up from suspension
    let wake_task = tokio::spawn(wake_up_recovery_task(timer.clone(), config.wake_check_interval()));

    // Create HTTP router with all endpoints
    let state = Arc::new(AppState::new(timer.clone(), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start       - Start the countdown");
    info!("  POST /pause       - Pause the countdown");
    info!("  POST /toggle      - Start or pause");
    info!("  POST /reset       - Restore the full duration of the current mode");
    info!("  POST /mode/:mode  - Switch to work, short_break or long_break");
    info!("  POST /visibility  - Reconcile after the client regained focus");
    info!("  GET  /status      - Current timer state");
    info!("  GET  /health      - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    wake_task.abort();
    if timer.shutdown().is_ok() {
        service_task.await?;
    }

    info!("Server shutdown complete");
    Ok(())
}
