//! Chat Transcript
//!
//! In-memory chat history shared between the web handlers. The transcript is
//! an ordered log of messages (insertion order = display order) plus the most
//! recently queried stop ID, so background refreshes can re-fetch arrivals
//! without a new user message.
//!
//! History lives for the process lifetime only; `clear` drops everything.

pub mod stop_id;

pub use stop_id::StopId;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Role name used as the CSS class on rendered bubbles
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A single entry in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    /// Display text; embedded newlines are preserved by the renderer
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

#[derive(Debug, Default)]
struct ChatLogInner {
    messages: Vec<ChatMessage>,
    last_stop: Option<StopId>,
}

/// Shared, mutex-guarded chat history
#[derive(Debug, Default)]
pub struct ChatLog {
    inner: Mutex<ChatLogInner>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the transcript
    pub async fn push(&self, sender: Sender, text: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.messages.push(ChatMessage::new(sender, text));
    }

    /// Remember the stop behind the latest prediction reply
    pub async fn record_stop(&self, stop: StopId) {
        let mut inner = self.inner.lock().await;
        inner.last_stop = Some(stop);
    }

    /// Stop ID of the most recent successful lookup, if any
    pub async fn last_stop(&self) -> Option<StopId> {
        let inner = self.inner.lock().await;
        inner.last_stop.clone()
    }

    /// Replace the text of the most recent bot message in place.
    ///
    /// Used by background refreshes so the transcript does not grow by one
    /// bubble per minute. Returns false when no bot message exists.
    pub async fn replace_last_bot(&self, text: impl Into<String>) -> bool {
        let mut inner = self.inner.lock().await;
        match inner
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.sender == Sender::Bot)
        {
            Some(msg) => {
                msg.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Copy of the transcript in display order
    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        let inner = self.inner.lock().await;
        inner.messages.clone()
    }

    /// Drop all messages and the remembered stop
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.messages.clear();
        inner.last_stop = None;
    }

    pub async fn len(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
