//! Chat Routes
//!
//! The chat-style web UI. Every interaction is a full navigation: the server
//! re-renders the whole page from the shared transcript.
//!
//! - GET  /        - render the transcript (welcome prompt when empty)
//! - POST /        - submit one free-text message, reply, re-render
//! - POST /refresh - re-fetch arrivals for the last stop, 204
//! - POST /clear   - drop the transcript, 204

use axum::{extract::State, http::StatusCode, response::Html, Form};
use serde::Deserialize;
use std::sync::Arc;

use crate::bustime::{prediction_reply, FormatMode};
use crate::chat::{Sender, StopId};
use crate::web::error::{WebError, WebResult};
use crate::web::render::render_page;
use crate::web::state::AppState;

/// Chat form submission
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    /// Stop ID or free-text question
    pub message: String,
}

/// GET /
pub async fn show_chat(State(state): State<Arc<AppState>>) -> Html<String> {
    let history = state.chat.snapshot().await;
    Html(render_page(&history))
}

/// POST /
///
/// Append the user message, resolve it to a bot reply, and re-render the
/// page. The browser enforces a non-empty field; a bypassed empty submission
/// is rejected here.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MessageForm>,
) -> WebResult<Html<String>> {
    let message = form.message.trim().to_string();
    if message.is_empty() {
        return Err(WebError::Validation("message cannot be empty".to_string()));
    }

    state.chat.push(Sender::User, &message).await;

    let reply = match StopId::extract(&message) {
        Some(stop) => {
            let text = fetch_reply(&state, &stop).await;
            state.chat.record_stop(stop).await;
            text
        }
        None => state.lang.invalid_stop_web().to_string(),
    };
    state.chat.push(Sender::Bot, reply).await;

    let history = state.chat.snapshot().await;
    Ok(Html(render_page(&history)))
}

/// POST /refresh
///
/// Background refresh from the client's 60-second loop. Re-fetches the last
/// queried stop and rewrites the newest bot bubble in place so the transcript
/// does not grow. Always 204; the client reloads regardless of outcome.
pub async fn refresh(State(state): State<Arc<AppState>>) -> StatusCode {
    if let Some(stop) = state.chat.last_stop().await {
        let text = fetch_reply(&state, &stop).await;
        if !state.chat.replace_last_bot(text).await {
            tracing::debug!(stop_id = %stop, "refresh with no bot message to update");
        }
    }
    StatusCode::NO_CONTENT
}

/// POST /clear
pub async fn clear(State(state): State<Arc<AppState>>) -> StatusCode {
    state.chat.clear().await;
    tracing::info!("chat history cleared");
    StatusCode::NO_CONTENT
}

/// Arrival text for a stop, with upstream failures surfaced as chat text
/// rather than HTTP errors.
async fn fetch_reply(state: &AppState, stop: &StopId) -> String {
    match state.predictions.predictions_for(stop).await {
        Ok(predictions) => prediction_reply(&predictions, state.lang, FormatMode::Web),
        Err(e) => {
            tracing::warn!(stop_id = %stop, error = %e, "prediction fetch failed");
            format!("Network error: {e}")
        }
    }
}
