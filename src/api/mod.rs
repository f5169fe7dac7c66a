//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.
//! It plays the presentation layer: clients render the returned snapshots.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/toggle", post(toggle_handler))
        .route("/reset", post(reset_handler))
        .route("/mode/:mode", post(mode_handler))
        .route("/visibility", post(visibility_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        engine::{EngineSettings, ManualClock},
        tasks::TimerService,
    };

    fn test_app() -> (Router, ManualClock) {
        let clock = ManualClock::default();
        let (service, handle) = TimerService::new(EngineSettings::default(), Box::new(clock.clone()));
        tokio::spawn(service.run());
        let state = Arc::new(AppState::new(handle, 20554, "127.0.0.1".to_string()));
        (create_router(state), clock)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_start_and_status() {
        let (app, _) = test_app();

        let (status, body) = send(&app, "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "applied");
        assert_eq!(body["timer"]["running"], true);

        let (status, body) = send(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["mode"], "work");
        assert_eq!(body["timer"]["display"], "25:00");
        assert_eq!(body["last_action"], "start");
    }

    #[tokio::test]
    async fn test_repeated_start_is_ignored() {
        let (app, _) = test_app();
        send(&app, "POST", "/start", None).await;

        let (status, body) = send(&app, "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ignored");
    }

    #[tokio::test]
    async fn test_pause_reports_remaining() {
        let (app, clock) = test_app();
        send(&app, "POST", "/start", None).await;
        clock.advance(chrono::Duration::seconds(10));

        let (_, body) = send(&app, "POST", "/pause", None).await;
        assert_eq!(body["timer"]["running"], false);
        assert_eq!(body["timer"]["remaining"], 1490);
        assert_eq!(body["timer"]["end_timestamp"], Value::Null);
    }

    #[tokio::test]
    async fn test_mode_change_while_running_needs_confirmation() {
        let (app, _) = test_app();
        send(&app, "POST", "/start", None).await;

        let (status, body) = send(&app, "POST", "/mode/long_break", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["timer"]["mode"], "work");
        assert_eq!(body["timer"]["running"], true);

        let (status, body) =
            send(&app, "POST", "/mode/long_break", Some(r#"{"confirm": true}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["mode"], "long_break");
        assert_eq!(body["timer"]["running"], false);
        assert_eq!(body["timer"]["remaining"], 900);
        assert_eq!(body["timer"]["color"], "#457ca3");
    }

    #[tokio::test]
    async fn test_unknown_mode_is_bad_request() {
        let (app, _) = test_app();
        let (status, _) = send(&app, "POST", "/mode/siesta", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_mode_body_is_bad_request() {
        let (app, _) = test_app();
        send(&app, "POST", "/start", None).await;

        let (status, _) = send(&app, "POST", "/mode/long_break", Some(r#"{"confirm": tru"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/mode/long_break", Some(r#"{"confirm": "yes"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/status", None).await;
        assert_eq!(body["timer"]["mode"], "work");
        assert_eq!(body["timer"]["running"], true);
    }

    #[tokio::test]
    async fn test_visibility_regain_completes_overdue_run() {
        let (app, clock) = test_app();
        send(&app, "POST", "/start", None).await;
        clock.advance(chrono::Duration::seconds(1600));

        let (status, body) = send(&app, "POST", "/visibility", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["mode"], "short_break");
        assert_eq!(body["timer"]["remaining"], 300);
        assert_eq!(body["timer"]["running"], false);
    }

    #[tokio::test]
    async fn test_toggle_and_reset() {
        let (app, clock) = test_app();

        let (_, body) = send(&app, "POST", "/toggle", None).await;
        assert_eq!(body["timer"]["running"], true);
        clock.advance(chrono::Duration::seconds(90));

        let (_, body) = send(&app, "POST", "/toggle", None).await;
        assert_eq!(body["message"], "Timer paused");
        assert_eq!(body["timer"]["display"], "23:30");

        let (_, body) = send(&app, "POST", "/reset", None).await;
        assert_eq!(body["timer"]["remaining"], 1500);
        assert_eq!(body["timer"]["progress"], 0.0);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
