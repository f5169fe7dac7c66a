//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{ApiResponse, HealthResponse, ModeRequest, StatusResponse};
use crate::{
    engine::{ModeChange, Transition},
    state::{AppState, TimerMode, TimerSnapshot},
    tasks::ServiceError,
};

fn service_error(e: ServiceError) -> StatusCode {
    error!("Timer service error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn current_snapshot(state: &AppState) -> Result<TimerSnapshot, StatusCode> {
    state.timer.snapshot().await.map_err(service_error)
}

async fn transition_response(
    state: &AppState,
    outcome: Transition,
    applied: &str,
    ignored: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    let snapshot = current_snapshot(state).await?;
    Ok(Json(match outcome {
        Transition::Applied => ApiResponse::applied(applied.to_string(), snapshot),
        Transition::Ignored => ApiResponse::ignored(ignored.to_string(), snapshot),
    }))
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("start");
    let outcome = state.timer.start().await.map_err(service_error)?;
    info!("Start endpoint called ({:?})", outcome);
    transition_response(&state, outcome, "Timer started", "Timer already running").await
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("pause");
    let outcome = state.timer.pause().await.map_err(service_error)?;
    info!("Pause endpoint called ({:?})", outcome);
    transition_response(&state, outcome, "Timer paused", "Timer not running").await
}

/// Handle POST /toggle - Start when paused, pause when running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("toggle");
    let outcome = state.timer.toggle().await.map_err(service_error)?;
    let snapshot = current_snapshot(&state).await?;
    let message = if snapshot.running { "Timer started" } else { "Timer paused" };
    info!("Toggle endpoint called - {}", message);
    Ok(Json(match outcome {
        Transition::Applied => ApiResponse::applied(message.to_string(), snapshot),
        Transition::Ignored => ApiResponse::ignored(message.to_string(), snapshot),
    }))
}

/// Handle POST /reset - Restore the full duration of the current mode
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("reset");
    let outcome = state.timer.reset().await.map_err(service_error)?;
    info!("Reset endpoint called");
    transition_response(&state, outcome, "Timer reset", "Timer reset").await
}

/// Handle POST /mode/:mode - Switch mode, optionally discarding a running countdown
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
    body: Result<Json<ModeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let mode: TimerMode = match mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            warn!("Rejecting mode request: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let confirm = match body {
        Ok(Json(request)) => request.confirm,
        // A bare POST without a JSON body means "do not confirm"
        Err(JsonRejection::MissingJsonContentType(_)) => false,
        Err(e) => {
            warn!("Rejecting mode request body: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    state.record_action(&format!("mode:{}", mode));
    let outcome = state.timer.set_mode(mode, confirm).await.map_err(service_error)?;
    let snapshot = current_snapshot(&state).await?;

    match outcome {
        ModeChange::Applied => {
            info!("Mode endpoint called - mode set to {}", mode);
            Ok((
                StatusCode::OK,
                Json(ApiResponse::applied(format!("Mode set to {}", mode), snapshot)),
            ))
        }
        ModeChange::Rejected | ModeChange::ConfirmationRequired(_) => {
            info!("Mode endpoint called - change to {} not confirmed", mode);
            Ok((
                StatusCode::CONFLICT,
                Json(ApiResponse::rejected(
                    "Timer is running; send {\"confirm\": true} to discard the current run".to_string(),
                    snapshot,
                )),
            ))
        }
    }
}

/// Handle POST /visibility - Host regained the foreground, reconcile with the wall clock
pub async fn visibility_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    state.timer.reconcile().map_err(service_error)?;
    let snapshot = current_snapshot(&state).await?;
    Ok(Json(ApiResponse::applied("Timer reconciled".to_string(), snapshot)))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = current_snapshot(&state).await?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
