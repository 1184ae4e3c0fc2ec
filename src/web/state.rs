//! Application State
//!
//! Shared state accessible by all web handlers, wrapped in `Arc` by the
//! router builder.

use crate::bustime::{Lang, PredictionSource};
use crate::chat::ChatLog;
use crate::ratelimit::RateLimiter;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
pub struct AppState {
    /// Chat transcript for the web UI
    pub chat: ChatLog,
    /// Source of arrival predictions (BusTime client in production)
    pub predictions: Arc<dyn PredictionSource>,
    /// Per-sender SMS rate limiter
    pub rate_limiter: RateLimiter,
    /// Reply language
    pub lang: Lang,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        predictions: Arc<dyn PredictionSource>,
        rate_limiter: RateLimiter,
        lang: Lang,
    ) -> Self {
        Self {
            chat: ChatLog::new(),
            predictions,
            rate_limiter,
            lang,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Web server configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl WebConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
