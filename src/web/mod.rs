//! BusChat Web Layer
//!
//! HTTP layer for BusChat, built with Axum.
//!
//! # Endpoints
//!
//! ## Chat UI
//! - `GET /` - render the chat transcript
//! - `POST /` - submit a chat message (form field `message`)
//! - `POST /refresh` - re-fetch arrivals for the last stop
//! - `POST /clear` - reset the chat history
//!
//! ## SMS
//! - `POST /bot` - Twilio inbound SMS webhook (TwiML reply)
//!
//! ## Assets
//! - `GET /static/app.js` - client script
//!
//! ## Health
//! - `GET /health/live` - liveness probe
//! - `GET /health` - status with uptime

pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::{AppState, WebConfig};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route(
            "/",
            get(routes::chat::show_chat).post(routes::chat::post_message),
        )
        .route("/refresh", post(routes::chat::refresh))
        .route("/clear", post(routes::chat::clear))
        .route("/bot", post(routes::sms::inbound_sms))
        .route("/static/app.js", get(routes::assets::app_js))
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the web server
pub async fn serve(state: AppState, config: &WebConfig) -> Result<(), WebError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("BusChat listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("BusChat shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bustime::{BusTimeError, Countdown, Lang, Prediction, PredictionSource};
    use crate::chat::StopId;
    use crate::ratelimit::{RateLimitConfig, RateLimiter};
    use crate::web::render::WELCOME_MESSAGE;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    struct StubSource {
        predictions: Vec<Prediction>,
        fail: bool,
    }

    impl StubSource {
        fn with_arrivals() -> Self {
            Self {
                predictions: vec![
                    Prediction::new("104", "Downtown", Countdown::Due),
                    Prediction::new("104", "Downtown", Countdown::Minutes(12)),
                    Prediction::new("202", "Airport", Countdown::Minutes(9)),
                ],
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                predictions: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl PredictionSource for StubSource {
        async fn predictions_for(
            &self,
            _stop: &StopId,
        ) -> Result<Vec<Prediction>, BusTimeError> {
            if self.fail {
                Err(BusTimeError::Unavailable)
            } else {
                Ok(self.predictions.clone())
            }
        }
    }

    fn test_app_with(source: StubSource, message_limit: u32) -> Router {
        let limiter = RateLimiter::new(RateLimitConfig {
            message_limit,
            ..Default::default()
        });
        let state = AppState::new(Arc::new(source), limiter, Lang::En);
        build_router(state)
    }

    fn test_app() -> Router {
        test_app_with(StubSource::with_arrivals(), 8)
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_transcript_shows_welcome() {
        let app = test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains(WELCOME_MESSAGE));
    }

    #[tokio::test]
    async fn test_post_message_renders_user_and_bot_bubbles() {
        let app = test_app();

        let response = app
            .oneshot(form_post("/", "message=Next+bus+at+42%3F"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("Next bus at 42?"));
        // Two groups come back as two lines; the renderer turns the newline
        // into an explicit break.
        assert!(page
            .contains("Route 104 Downtown: Due and 12 minutes<br>Route 202 Airport: 9 minutes"));
        assert!(!page.contains(WELCOME_MESSAGE));
    }

    #[tokio::test]
    async fn test_post_message_without_stop_id_gets_guidance() {
        let app = test_app();

        let response = app
            .oneshot(form_post("/", "message=hello+there"))
            .await
            .unwrap();

        let page = body_text(response).await;
        assert!(page.contains("Please enter a valid 1-4 digit bus stop number."));
    }

    #[tokio::test]
    async fn test_post_empty_message_is_rejected() {
        let app = test_app();

        let response = app.oneshot(form_post("/", "message=++")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_bot_text() {
        let app = test_app_with(StubSource::failing(), 8);

        let response = app.oneshot(form_post("/", "message=1708")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("Network error:"));
    }

    #[tokio::test]
    async fn test_clear_resets_transcript() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(form_post("/", "message=1708"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/clear")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains(WELCOME_MESSAGE));
    }

    #[tokio::test]
    async fn test_refresh_is_no_content_with_and_without_history() {
        let app = test_app();

        // No history yet: nothing to refresh, still 204.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        app.clone()
            .oneshot(form_post("/", "message=1708"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // The transcript must not have grown from the refresh.
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_text(response).await;
        assert_eq!(page.matches("class=\"message").count(), 2);
    }

    #[tokio::test]
    async fn test_sms_reply_is_twiml() {
        let app = test_app();

        let response = app
            .oneshot(form_post("/bot", "Body=1708&From=%2B17025550001"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/xml"
        );
        let xml = body_text(response).await;
        assert!(xml.contains("<Response><Message>"));
        assert!(xml.contains("Route 104 Downtown: Due"));
    }

    #[tokio::test]
    async fn test_sms_free_text_is_rejected() {
        let app = test_app();

        let response = app
            .oneshot(form_post("/bot", "Body=next+bus+at+1708&From=%2B17025550001"))
            .await
            .unwrap();

        let xml = body_text(response).await;
        assert!(xml.contains("Send a valid 1-4 digit stop number."));
    }

    #[tokio::test]
    async fn test_sms_without_sender_is_an_error_reply() {
        let app = test_app();

        let response = app.oneshot(form_post("/bot", "Body=1708")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let xml = body_text(response).await;
        assert!(xml.contains("Error: No sender."));
    }

    #[tokio::test]
    async fn test_sms_rate_limit_message() {
        let app = test_app_with(StubSource::with_arrivals(), 1);

        let response = app
            .clone()
            .oneshot(form_post("/bot", "Body=1708&From=%2B17025550001"))
            .await
            .unwrap();
        let xml = body_text(response).await;
        assert!(xml.contains("Route 104 Downtown"));

        let response = app
            .oneshot(form_post("/bot", "Body=1708&From=%2B17025550001"))
            .await
            .unwrap();
        // The apostrophe in "You've" is XML-escaped, so match past it.
        let xml = body_text(response).await;
        assert!(xml.contains("reached the limit of 1 interactions per hour."));
    }

    #[tokio::test]
    async fn test_client_script_is_served() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/app.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_status_and_transcript_size() {
        let app = test_app();

        app.clone()
            .oneshot(form_post("/", "message=1708"))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["chat_messages"], 2);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["uptime_seconds"].is_u64());
    }
}
