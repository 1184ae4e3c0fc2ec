//! Rate Limiting
//!
//! Fixed-window limiter for inbound SMS senders. Each sender gets a count and
//! a window deadline one hour out; once the deadline passes the window resets.
//! Allowlisted senders bypass the limit entirely.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Messages allowed per window
    pub message_limit: u32,
    /// Window length in minutes
    pub window_minutes: i64,
    /// Sender IDs exempt from limiting
    pub allowlist: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            message_limit: 8,
            window_minutes: 60,
            allowlist: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct WindowState {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Per-sender fixed-window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, WindowState>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Messages allowed per window
    pub fn limit(&self) -> u32 {
        self.config.message_limit
    }

    /// Record one interaction from `sender` and report whether it is allowed.
    pub fn check(&self, sender: &str) -> bool {
        self.check_at(sender, Utc::now())
    }

    fn check_at(&self, sender: &str, now: DateTime<Utc>) -> bool {
        if self.config.allowlist.iter().any(|id| id == sender) {
            return true;
        }

        let window = Duration::minutes(self.config.window_minutes);
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let state = windows.entry(sender.to_string()).or_insert(WindowState {
            count: 0,
            reset_at: now + window,
        });

        if now > state.reset_at {
            state.count = 1;
            state.reset_at = now + window;
            return true;
        }

        if state.count < self.config.message_limit {
            state.count += 1;
            true
        } else {
            tracing::debug!(sender = %sender, "rate limit exceeded");
            false
        }
    }
}
