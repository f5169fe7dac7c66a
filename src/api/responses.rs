//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerSnapshot;

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The operation changed the timer
    pub fn applied(message: String, timer: TimerSnapshot) -> Self {
        Self::new("applied", message, timer)
    }

    /// The operation was a no-op in the current state
    pub fn ignored(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ignored", message, timer)
    }

    /// The operation was refused, the timer is unchanged
    pub fn rejected(message: String, timer: TimerSnapshot) -> Self {
        Self::new("rejected", message, timer)
    }
}

/// Body of `POST /mode/:mode`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeRequest {
    /// Discard a running countdown if needed
    #[serde(default)]
    pub confirm: bool,
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
