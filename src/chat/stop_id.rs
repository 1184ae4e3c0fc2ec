//! Stop IDs
//!
//! A stop ID is a 1-4 digit identifier for a physical bus stop. SMS input is
//! held to the strict form (the whole message is digits); web chat input is
//! free text, so the first standalone 1-4 digit token is taken instead.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Compiled once; the pattern is a constant, so a failure here is a bug
/// worth panicking over rather than reporting as "no stop ID found".
fn stop_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d{1,4}\b").expect("stop ID pattern is valid"))
}

/// Validated 1-4 digit bus stop identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopId(String);

impl StopId {
    /// Strict parse: the entire input (after trimming) must be 1-4 digits.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if !trimmed.is_empty()
            && trimmed.len() <= 4
            && trimmed.chars().all(|c| c.is_ascii_digit())
        {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    /// Lenient parse: pick the first standalone 1-4 digit token out of free
    /// text, e.g. "when does the bus get to 1708?" yields 1708.
    pub fn extract(text: &str) -> Option<Self> {
        stop_id_pattern()
            .find(text.trim())
            .map(|m| Self(m.as_str().to_string()))
    }

    /// Zero-padded form the upstream API expects, e.g. "42" -> "0042"
    pub fn padded(&self) -> String {
        format!("{:0>4}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
