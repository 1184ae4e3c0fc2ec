//! BusTime Integration
//!
//! Client and formatting for the upstream BusTime `getpredictions` API, the
//! source of real-time arrival predictions for a stop.
//!
//! - [`client`]: HTTP client for the prediction feed
//! - [`format`]: turns raw predictions into rider-facing text

pub mod client;
pub mod format;

pub use client::{BusTimeClient, BusTimeConfig, BusTimeError, PredictionSource};
pub use format::{format_predictions, prediction_reply, FormatMode, Lang};

/// How soon a predicted bus arrives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Countdown {
    /// Arriving within the next minute ("DUE" on the wire)
    Due,
    /// Predicted minutes until arrival
    Minutes(u32),
    /// Any other feed token, e.g. "DLY" for a delayed vehicle
    Other(String),
}

impl Countdown {
    /// Interpret the feed's `prdctdn` field.
    pub fn parse(raw: &str) -> Self {
        if raw == "DUE" {
            return Countdown::Due;
        }
        match raw.parse::<u32>() {
            Ok(minutes) => Countdown::Minutes(minutes),
            Err(_) => Countdown::Other(raw.to_string()),
        }
    }
}

/// One predicted arrival at a stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// Route designator, e.g. "104"
    pub route: String,
    /// Destination headsign
    pub destination: String,
    pub countdown: Countdown,
}

impl Prediction {
    pub fn new(route: impl Into<String>, destination: impl Into<String>, countdown: Countdown) -> Self {
        Self {
            route: route.into(),
            destination: destination.into(),
            countdown,
        }
    }
}
