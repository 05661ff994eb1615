//! External inference backend client.
//!
//! The engine treats the backend as optional capability: when it is absent,
//! unauthenticated, or failing, analysis degrades to the local heuristics.
//! Sentiment and emotion classification are separate endpoints so the engine
//! can request them in parallel.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use mentio_core::{EmotionWeight, SentimentLabel};

use crate::error::SentimentError;

/// Classification capability used by the analysis engine.
///
/// Used generically (not as a trait object), so the native `async fn` form
/// is sufficient here.
#[allow(async_fn_in_trait)]
pub trait SentimentBackend: Send + Sync {
    /// Classify polarity; score is in [0, 1].
    async fn classify_sentiment(
        &self,
        text: &str,
    ) -> Result<(SentimentLabel, f64), SentimentError>;

    /// Classify the emotion distribution.
    async fn classify_emotions(&self, text: &str) -> Result<Vec<EmotionWeight>, SentimentError>;
}

/// HTTP inference client.
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    label: SentimentLabel,
    score: f64,
}

#[derive(Debug, Deserialize)]
struct EmotionsResponse {
    emotions: Vec<EmotionWeight>,
}

impl InferenceClient {
    /// Build a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, SentimentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn post_classify<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        text: &str,
    ) -> Result<T, SentimentError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut request = self.http.post(&url).json(&ClassifyRequest { text });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::Inference(format!(
                "backend returned status {status} for {endpoint}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SentimentError::Inference(format!("{endpoint} parse error: {e}")))
    }
}

impl SentimentBackend for InferenceClient {
    async fn classify_sentiment(
        &self,
        text: &str,
    ) -> Result<(SentimentLabel, f64), SentimentError> {
        let parsed: SentimentResponse = self.post_classify("v1/sentiment", text).await?;
        Ok((parsed.label, parsed.score.clamp(0.0, 1.0)))
    }

    async fn classify_emotions(&self, text: &str) -> Result<Vec<EmotionWeight>, SentimentError> {
        let parsed: EmotionsResponse = self.post_classify("v1/emotions", text).await?;
        Ok(parsed.emotions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn classify_sentiment_parses_label_and_score() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sentiment"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"label": "positive", "score": 0.93})),
            )
            .mount(&server)
            .await;

        let client = InferenceClient::new(&server.uri(), None, 5).expect("client");
        let (label, score) = client
            .classify_sentiment("love it")
            .await
            .expect("classification");
        assert_eq!(label, SentimentLabel::Positive);
        assert!((score - 0.93).abs() < 1e-9);
    }

    #[tokio::test]
    async fn out_of_range_backend_score_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sentiment"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"label": "positive", "score": 1.7})),
            )
            .mount(&server)
            .await;

        let client = InferenceClient::new(&server.uri(), None, 5).expect("client");
        let (_, score) = client.classify_sentiment("x").await.expect("classification");
        assert_eq!(score, 1.0);
    }

    #[tokio::test]
    async fn unauthenticated_backend_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sentiment"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = InferenceClient::new(&server.uri(), None, 5).expect("client");
        let result = client.classify_sentiment("x").await;
        assert!(
            matches!(result, Err(SentimentError::Inference(_))),
            "expected Inference error, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn classify_emotions_parses_distribution() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/emotions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "emotions": [
                    {"emotion": "joy", "weight": 0.8},
                    {"emotion": "surprise", "weight": 0.2}
                ]
            })))
            .mount(&server)
            .await;

        let client = InferenceClient::new(&server.uri(), None, 5).expect("client");
        let emotions = client.classify_emotions("wow, love it").await.expect("emotions");
        assert_eq!(emotions.len(), 2);
        assert_eq!(emotions[0].emotion, "joy");
    }
}
