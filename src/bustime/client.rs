//! BusTime REST API Client
//!
//! HTTP client for the BusTime `getpredictions` v3 endpoint. The feed wraps
//! everything in a `bustime-response` envelope; a stop with no service simply
//! has no `prd` array, which is a normal "no predictions" outcome rather than
//! an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{Countdown, Prediction};
use crate::chat::StopId;

/// Configuration for the BusTime client
#[derive(Debug, Clone)]
pub struct BusTimeConfig {
    /// Full URL of the getpredictions endpoint
    pub base_url: String,
    /// API key issued by the transit agency
    pub api_key: String,
    /// Data feed name ("rtpidatafeed" query parameter)
    pub data_feed: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum predictions to request per stop
    pub max_predictions: u32,
}

impl Default for BusTimeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://riderts.app/bustime/api/v3/getpredictions".to_string(),
            api_key: String::new(),
            data_feed: "bustime".to_string(),
            request_timeout_ms: 5000,
            max_predictions: 99,
        }
    }
}

/// Source of arrival predictions for a stop.
///
/// The web and SMS handlers depend on this seam rather than on the concrete
/// client, so tests can serve canned predictions without the network.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn predictions_for(&self, stop: &StopId) -> Result<Vec<Prediction>, BusTimeError>;
}

/// BusTime REST API client
pub struct BusTimeClient {
    client: Client,
    config: BusTimeConfig,
}

impl BusTimeClient {
    /// Create a new client with the given configuration
    pub fn new(config: BusTimeConfig) -> Result<Self, BusTimeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(BusTimeError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &BusTimeConfig {
        &self.config
    }
}

#[async_trait]
impl PredictionSource for BusTimeClient {
    async fn predictions_for(&self, stop: &StopId) -> Result<Vec<Prediction>, BusTimeError> {
        let padded = stop.padded();
        let max = self.config.max_predictions.to_string();
        tracing::info!(stop_id = %padded, "fetching predictions");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("rtpidatafeed", self.config.data_feed.as_str()),
                ("stpid", padded.as_str()),
                ("format", "json"),
                ("max", max.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BusTimeError::Timeout
                } else if e.is_connect() {
                    BusTimeError::Unavailable
                } else {
                    BusTimeError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BusTimeError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let envelope: PredictionsEnvelope = response
            .json()
            .await
            .map_err(|e| BusTimeError::InvalidResponse(e.to_string()))?;

        let predictions = envelope
            .bustime_response
            .prd
            .unwrap_or_default()
            .into_iter()
            .map(|prd| {
                Prediction::new(
                    prd.rt.unwrap_or_else(|| "N/A".to_string()),
                    prd.des.unwrap_or_else(|| "N/A".to_string()),
                    Countdown::parse(prd.prdctdn.as_deref().unwrap_or("N/A")),
                )
            })
            .collect();

        Ok(predictions)
    }
}

// ============================================
// Wire DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct PredictionsEnvelope {
    #[serde(rename = "bustime-response", default)]
    bustime_response: BusTimeBody,
}

#[derive(Debug, Default, Deserialize)]
struct BusTimeBody {
    #[serde(default)]
    prd: Option<Vec<PrdDto>>,
}

#[derive(Debug, Deserialize)]
struct PrdDto {
    #[serde(default)]
    rt: Option<String>,
    #[serde(default)]
    des: Option<String>,
    #[serde(default)]
    prdctdn: Option<String>,
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the BusTime feed
#[derive(Error, Debug)]
pub enum BusTimeError {
    #[error("BusTime feed unavailable")]
    Unavailable,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("BusTime API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("request timeout")]
    Timeout,

    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> BusTimeClient {
        BusTimeClient::new(BusTimeConfig {
            base_url: format!("{}/getpredictions", server.url()),
            api_key: "test-key".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = BusTimeConfig::default();
        assert!(config.base_url.ends_with("/getpredictions"));
        assert_eq!(config.data_feed, "bustime");
        assert_eq!(config.max_predictions, 99);
    }

    #[tokio::test]
    async fn test_predictions_parsed_from_envelope() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/getpredictions")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("stpid".into(), "0042".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "bustime-response": {
                        "prd": [
                            {"rt": "104", "des": "Downtown", "prdctdn": "DUE"},
                            {"rt": "104", "des": "Downtown", "prdctdn": "17"},
                            {"rt": "202", "des": "Airport", "prdctdn": "DLY"}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let stop = StopId::parse("42").unwrap();
        let predictions = client.predictions_for(&stop).await.unwrap();

        mock.assert_async().await;
        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions[0].route, "104");
        assert_eq!(predictions[0].countdown, Countdown::Due);
        assert_eq!(predictions[1].countdown, Countdown::Minutes(17));
        assert_eq!(
            predictions[2].countdown,
            Countdown::Other("DLY".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_prd_array_is_empty_not_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/getpredictions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"bustime-response": {"error": [{"msg": "No service scheduled"}]}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let stop = StopId::parse("9999").unwrap();
        let predictions = client.predictions_for(&stop).await.unwrap();

        assert!(predictions.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_surfaces_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/getpredictions")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream down")
            .create_async()
            .await;

        let client = client_for(&server);
        let stop = StopId::parse("42").unwrap();
        let err = client.predictions_for(&stop).await.unwrap_err();

        match err {
            BusTimeError::ApiError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/getpredictions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let stop = StopId::parse("42").unwrap();
        let err = client.predictions_for(&stop).await.unwrap_err();

        assert!(matches!(err, BusTimeError::InvalidResponse(_)));
    }
}
