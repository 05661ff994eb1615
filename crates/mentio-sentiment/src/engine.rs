//! The sentiment engine: a result cache in front of a pluggable inference
//! backend with a deterministic heuristic fallback.
//!
//! `analyze` is infallible by design — backend errors degrade to the local
//! heuristics inside this module and are never surfaced to callers. The
//! cache is keyed by content fingerprint, so repeated identical text across
//! products and sources is analyzed at most once per process.

use std::collections::HashMap;

use tokio::sync::RwLock;

use mentio_core::{SentimentAnalysis, SentimentLabel};

use crate::aspects::AspectExtractor;
use crate::credibility::credibility_score;
use crate::emotions::heuristic_emotions;
use crate::inference::SentimentBackend;
use crate::lexicon::{label_for_score, lexicon_score, polarity_to_unit};

/// Cached analysis engine. Shared across the process behind an `Arc`;
/// concurrent readers are cheap and redundant concurrent writers are safe
/// (the computation is a pure function of the fingerprint, last write wins).
pub struct Analyzer<B> {
    backend: Option<B>,
    aspects: Box<dyn AspectExtractor>,
    cache: RwLock<HashMap<String, SentimentAnalysis>>,
}

impl<B: SentimentBackend> Analyzer<B> {
    #[must_use]
    pub fn new(backend: Option<B>, aspects: Box<dyn AspectExtractor>) -> Self {
        Self {
            backend,
            aspects,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Analyze a cleaned text, serving from the result cache when possible.
    ///
    /// The fingerprint must be the one derived from `text` (see
    /// [`crate::normalize::fingerprint`]); the pipeline guarantees this.
    pub async fn analyze(&self, fingerprint: &str, text: &str) -> SentimentAnalysis {
        if let Some(hit) = self.cache.read().await.get(fingerprint) {
            tracing::debug!(fingerprint, "analysis cache hit");
            return hit.clone();
        }

        let analysis = self.compute(text).await;

        self.cache
            .write()
            .await
            .insert(fingerprint.to_string(), analysis.clone());

        analysis
    }

    /// Number of cached analyses (diagnostics).
    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn compute(&self, text: &str) -> SentimentAnalysis {
        let (label, score, emotions) = match &self.backend {
            Some(backend) => {
                // Both classifications are independent; request them in
                // parallel and degrade each one separately.
                let (sentiment, emotions) = tokio::join!(
                    backend.classify_sentiment(text),
                    backend.classify_emotions(text)
                );

                let (label, score) = match sentiment {
                    Ok(classified) => classified,
                    Err(e) => {
                        tracing::warn!(error = %e, "sentiment backend failed; using heuristic");
                        heuristic_sentiment(text)
                    }
                };

                let emotions = match emotions {
                    Ok(distribution) if !distribution.is_empty() => distribution,
                    Ok(_) => heuristic_emotions(text),
                    Err(e) => {
                        tracing::warn!(error = %e, "emotion backend failed; using heuristic");
                        heuristic_emotions(text)
                    }
                };

                (label, score, emotions)
            }
            None => {
                let (label, score) = heuristic_sentiment(text);
                (label, score, heuristic_emotions(text))
            }
        };

        let (credibility, credibility_reasons) = credibility_score(text);
        let aspects = self.aspects.extract(text);

        SentimentAnalysis {
            label,
            score,
            emotions,
            credibility,
            credibility_reasons,
            aspects,
        }
    }
}

fn heuristic_sentiment(text: &str) -> (SentimentLabel, f64) {
    let score = polarity_to_unit(lexicon_score(text));
    (label_for_score(score), score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use mentio_core::{AspectMode, EmotionWeight};

    use crate::aspects::select_aspect_extractor;
    use crate::error::SentimentError;
    use crate::normalize::fingerprint;

    /// Backend that counts calls and returns fixed classifications.
    #[derive(Clone)]
    struct CountingBackend {
        sentiment_calls: Arc<AtomicU32>,
        emotion_calls: Arc<AtomicU32>,
    }

    impl CountingBackend {
        fn new() -> Self {
            Self {
                sentiment_calls: Arc::new(AtomicU32::new(0)),
                emotion_calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    impl SentimentBackend for CountingBackend {
        async fn classify_sentiment(
            &self,
            _text: &str,
        ) -> Result<(SentimentLabel, f64), SentimentError> {
            self.sentiment_calls.fetch_add(1, Ordering::SeqCst);
            Ok((SentimentLabel::Positive, 0.91))
        }

        async fn classify_emotions(
            &self,
            _text: &str,
        ) -> Result<Vec<EmotionWeight>, SentimentError> {
            self.emotion_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![EmotionWeight {
                emotion: "joy".to_string(),
                weight: 1.0,
            }])
        }
    }

    /// Backend that always fails, to exercise the fallback path.
    struct FailingBackend;

    impl SentimentBackend for FailingBackend {
        async fn classify_sentiment(
            &self,
            _text: &str,
        ) -> Result<(SentimentLabel, f64), SentimentError> {
            Err(SentimentError::Inference("backend down".to_string()))
        }

        async fn classify_emotions(
            &self,
            _text: &str,
        ) -> Result<Vec<EmotionWeight>, SentimentError> {
            Err(SentimentError::Inference("backend down".to_string()))
        }
    }

    fn analyzer_with<B: SentimentBackend>(backend: Option<B>) -> Analyzer<B> {
        Analyzer::new(backend, select_aspect_extractor(AspectMode::Window))
    }

    #[tokio::test]
    async fn second_analysis_hits_cache_with_zero_backend_calls() {
        let backend = CountingBackend::new();
        let calls = Arc::clone(&backend.sentiment_calls);
        let emotion_calls = Arc::clone(&backend.emotion_calls);
        let analyzer = analyzer_with(Some(backend));

        let text = "Great battery, love it";
        let fp = fingerprint(text);

        let first = analyzer.analyze(&fp, text).await;
        let second = analyzer.analyze(&fp, text).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one backend call");
        assert_eq!(emotion_calls.load(Ordering::SeqCst), 1);

        // Byte-identical output on the cache hit.
        let first_json = serde_json::to_string(&first).expect("serialize");
        let second_json = serde_json::to_string(&second).expect("serialize");
        assert_eq!(first_json, second_json);

        assert_eq!(analyzer.cache_len().await, 1);
    }

    #[tokio::test]
    async fn failing_backend_degrades_to_heuristic_without_error() {
        let analyzer = analyzer_with(Some(FailingBackend));

        let text = "terrible product, arrived broken";
        let analysis = analyzer.analyze(&fingerprint(text), text).await;

        assert_eq!(analysis.label, SentimentLabel::Negative);
        assert!(analysis.score < 0.5);
        assert!(!analysis.emotions.is_empty(), "heuristic emotions expected");
    }

    #[tokio::test]
    async fn missing_backend_uses_heuristics() {
        let analyzer: Analyzer<CountingBackend> = analyzer_with(None);

        let text = "love this great product";
        let analysis = analyzer.analyze(&fingerprint(text), text).await;

        assert_eq!(analysis.label, SentimentLabel::Positive);
        assert!(analysis.score > 0.5);
        assert_eq!(analysis.primary_emotion(), Some("joy"));
    }

    #[tokio::test]
    async fn analysis_always_carries_credibility_reasons() {
        let analyzer: Analyzer<CountingBackend> = analyzer_with(None);
        let text = "ok";
        let analysis = analyzer.analyze(&fingerprint(text), text).await;
        assert!((0.0..=100.0).contains(&analysis.credibility));
        assert!(!analysis.credibility_reasons.is_empty());
    }

    #[tokio::test]
    async fn different_texts_occupy_separate_cache_entries() {
        let analyzer: Analyzer<CountingBackend> = analyzer_with(None);
        for text in ["first text", "second text", "third text"] {
            analyzer.analyze(&fingerprint(text), text).await;
        }
        assert_eq!(analyzer.cache_len().await, 3);
    }
}
