//! Sentiment collaborator
//!
//! Best-effort client for an external sentiment-classification service. The
//! blender treats every error from here as "no auxiliary signal".

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_SENTIMENT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";

#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    #[error("No API token configured for the sentiment service")]
    MissingCredential,
    #[error("Sentiment service is disabled")]
    Disabled,
    #[error("Sentiment request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed sentiment response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentPrediction {
    pub label: String,
    pub confidence: f64,
}

impl SentimentPrediction {
    pub fn is_negative(&self) -> bool {
        self.label == "NEGATIVE"
    }

    /// Reads the first entry of a `[{label, score}, ...]` array. Any other
    /// shape, nested arrays included, is malformed.
    pub fn from_response(body: &Value) -> Result<Self, SentimentError> {
        let prediction = body
            .as_array()
            .ok_or_else(|| SentimentError::MalformedResponse("expected a JSON array".into()))?
            .first()
            .ok_or_else(|| SentimentError::MalformedResponse("empty prediction list".into()))?;

        let label = prediction
            .get("label")
            .and_then(Value::as_str)
            .ok_or_else(|| SentimentError::MalformedResponse("missing label".into()))?;
        let confidence = prediction
            .get("score")
            .and_then(Value::as_f64)
            .ok_or_else(|| SentimentError::MalformedResponse("missing score".into()))?;

        Ok(Self {
            label: label.to_string(),
            confidence,
        })
    }
}

#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentPrediction, SentimentError>;
    fn name(&self) -> &str;
}

/// Client for the Hugging Face inference API.
pub struct HuggingFaceClient {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HuggingFaceClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        })
    }
}

#[async_trait]
impl SentimentSource for HuggingFaceClient {
    async fn classify(&self, text: &str) -> Result<SentimentPrediction, SentimentError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or(SentimentError::MissingCredential)?;

        let body: Value = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&json!({ "inputs": text }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        SentimentPrediction::from_response(&body)
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

/// Source used when the collaborator is switched off.
pub struct DisabledSentiment;

#[async_trait]
impl SentimentSource for DisabledSentiment {
    async fn classify(&self, _text: &str) -> Result<SentimentPrediction, SentimentError> {
        Err(SentimentError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/classify", addr)
    }

    #[test]
    fn test_parses_first_prediction() {
        let body = json!([
            { "label": "NEGATIVE", "score": 0.93 },
            { "label": "POSITIVE", "score": 0.07 }
        ]);
        let prediction = SentimentPrediction::from_response(&body).unwrap();
        assert!(prediction.is_negative());
        assert_eq!(prediction.confidence, 0.93);

        let body = json!([{ "label": "POSITIVE", "score": 0.8 }]);
        let prediction = SentimentPrediction::from_response(&body).unwrap();
        assert!(!prediction.is_negative());
    }

    #[test]
    fn test_negative_label_is_exact() {
        for label in ["negative", "Negative", "NEG"] {
            let prediction = SentimentPrediction {
                label: label.to_string(),
                confidence: 0.9,
            };
            assert!(!prediction.is_negative(), "label: {label}");
        }
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        for body in [
            json!({ "label": "NEGATIVE", "score": 0.9 }),
            json!([]),
            json!([[]]),
            json!([[{ "label": "NEGATIVE", "score": 0.9 }]]),
            json!([{ "score": 0.9 }]),
            json!([{ "label": "NEGATIVE" }]),
            json!({ "error": "Model is loading" }),
        ] {
            assert!(matches!(
                SentimentPrediction::from_response(&body),
                Err(SentimentError::MalformedResponse(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_missing_token_skips_request() {
        let client =
            HuggingFaceClient::new("http://127.0.0.1:9/unused", None, Duration::from_secs(1))
                .unwrap();
        let result = client.classify("hello").await;
        assert!(matches!(result, Err(SentimentError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_sends_inputs_and_bearer_token() {
        let router = Router::new().route(
            "/classify",
            post(
                |headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer secret");
                    if authorized && body["inputs"] == "pay now" {
                        (
                            StatusCode::OK,
                            Json(json!([{ "label": "NEGATIVE", "score": 0.75 }])),
                        )
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad" })))
                    }
                },
            ),
        );
        let endpoint = spawn_stub(router).await;

        let client =
            HuggingFaceClient::new(endpoint, Some("secret".into()), Duration::from_secs(5))
                .unwrap();
        let prediction = client.classify("pay now").await.unwrap();
        assert!(prediction.is_negative());
        assert_eq!(prediction.confidence, 0.75);
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        let router = Router::new().route(
            "/classify",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading") }),
        );
        let endpoint = spawn_stub(router).await;

        let client =
            HuggingFaceClient::new(endpoint, Some("secret".into()), Duration::from_secs(5))
                .unwrap();
        assert!(matches!(
            client.classify("hi").await,
            Err(SentimentError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_source_always_fails() {
        assert!(matches!(
            DisabledSentiment.classify("anything").await,
            Err(SentimentError::Disabled)
        ));
    }
}
