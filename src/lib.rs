//! # BusChat
//!
//! Real-time bus arrival predictions served through a chat-style web UI and
//! an SMS bot, backed by a transit agency's BusTime prediction feed.
//!
//! ## Modules
//!
//! - [`bustime`]: upstream prediction client and rider-facing formatting
//! - [`chat`]: chat transcript and stop-ID parsing
//! - [`ratelimit`]: per-sender SMS rate limiting
//! - [`twiml`]: TwiML replies for the SMS webhook
//! - [`web`]: Axum web layer (chat UI, SMS webhook, health)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use buschat::bustime::{BusTimeClient, BusTimeConfig, Lang};
//! use buschat::ratelimit::{RateLimitConfig, RateLimiter};
//! use buschat::web::{serve, AppState, WebConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(BusTimeClient::new(BusTimeConfig::default())?);
//!     let limiter = RateLimiter::new(RateLimitConfig::default());
//!     let config = WebConfig::default();
//!
//!     let state = AppState::new(client, limiter, Lang::En);
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod bustime;
pub mod chat;
pub mod config;
pub mod ratelimit;
pub mod twiml;
pub mod web;

// Re-export top-level types for convenience
pub use bustime::{
    BusTimeClient, BusTimeConfig, BusTimeError, Countdown, FormatMode, Lang, Prediction,
    PredictionSource,
};

pub use chat::{ChatLog, ChatMessage, Sender, StopId};

pub use ratelimit::{RateLimitConfig, RateLimiter};

pub use web::{build_router, serve, AppState, WebConfig, WebError};

pub use config::{Config, ConfigError};
