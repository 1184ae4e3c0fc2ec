//! SMS Routes
//!
//! Twilio-style inbound SMS webhook. Twilio posts the sender and body as form
//! fields and expects a TwiML document back; the reply body is always HTTP
//! 200 so the carrier delivers it.
//!
//! - POST /bot - inbound SMS, TwiML reply

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::bustime::{prediction_reply, FormatMode};
use crate::chat::StopId;
use crate::twiml;
use crate::web::state::AppState;

/// Inbound SMS webhook payload (Twilio field names)
#[derive(Debug, Deserialize)]
pub struct SmsInbound {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}

/// POST /bot
pub async fn inbound_sms(
    State(state): State<Arc<AppState>>,
    Form(inbound): Form<SmsInbound>,
) -> Response {
    let reply = reply_text(&state, &inbound).await;
    (
        [(CONTENT_TYPE, "application/xml")],
        twiml::messaging_response(&reply),
    )
        .into_response()
}

async fn reply_text(state: &AppState, inbound: &SmsInbound) -> String {
    let body = inbound.body.trim();

    if inbound.from.is_empty() {
        tracing::warn!("inbound SMS without sender");
        return "Error: No sender.".to_string();
    }

    if !state.rate_limiter.check(&inbound.from) {
        return state.lang.rate_limited(state.rate_limiter.limit());
    }

    // SMS requires the whole body to be a stop number; free text is not
    // searched the way the web chat input is.
    match StopId::parse(body) {
        Some(stop) => match state.predictions.predictions_for(&stop).await {
            Ok(predictions) => prediction_reply(&predictions, state.lang, FormatMode::Sms),
            Err(e) => {
                tracing::warn!(stop_id = %stop, error = %e, "prediction fetch failed");
                format!("Network error: {e}")
            }
        },
        None => state.lang.invalid_stop_sms().to_string(),
    }
}
