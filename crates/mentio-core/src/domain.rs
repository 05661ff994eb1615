//! Domain types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External source a mention was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Video-platform comment threads.
    Video,
    /// Forum and social-board search results.
    Forum,
    /// Microblog post search.
    Microblog,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Video => "video",
            SourceKind::Forum => "forum",
            SourceKind::Microblog => "microblog",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of raw user-generated content discovered by a source adapter.
///
/// Ephemeral: consumed by the normalizer, never persisted directly.
#[derive(Debug, Clone)]
pub struct RawMention {
    pub text: String,
    pub author: Option<String>,
    pub source: SourceKind,
    pub url: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes: i64,
    pub replies: i64,
    pub reposts: i64,
}

/// A canonical mention ready to be written to the store.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: i64,
    /// SHA-256 hex of the cleaned text; unique within the product scope.
    pub fingerprint: String,
    pub text: String,
    pub source: SourceKind,
    pub author: Option<String>,
    pub url: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes: i64,
    pub replies: i64,
    pub reposts: i64,
}

/// A canonical mention as read back from the store.
#[derive(Debug, Clone)]
pub struct StoredReview {
    pub id: i64,
    pub product_id: i64,
    pub fingerprint: String,
    pub text: String,
    pub source: String,
    pub author: Option<String>,
    pub url: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes: i64,
    pub replies: i64,
    pub reposts: i64,
    pub created_at: DateTime<Utc>,
}

/// Sentiment classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Error,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Error => "error",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emotion and its weight within a mention's emotion distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionWeight {
    pub emotion: String,
    pub weight: f64,
}

/// A named sub-topic (price, quality, shipping, ...) with its own local
/// sentiment within one mention. Scores are in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectScore {
    pub aspect: String,
    pub score: f64,
}

/// Composite analysis of one mention. Created once per review, immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub label: SentimentLabel,
    /// Polarity in [0, 1]; 0.5 is neutral.
    pub score: f64,
    pub emotions: Vec<EmotionWeight>,
    /// Heuristic trust estimate in [0, 100], independent of polarity.
    pub credibility: f64,
    pub credibility_reasons: Vec<String>,
    pub aspects: Vec<AspectScore>,
}

impl SentimentAnalysis {
    /// The emotion with the largest weight, if any.
    #[must_use]
    pub fn primary_emotion(&self) -> Option<&str> {
        self.emotions
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
            .map(|e| e.emotion.as_str())
    }
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert draft produced by the evaluator (or a manual caller).
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub product_id: Option<i64>,
    pub kind: String,
    pub message: String,
    pub severity: Severity,
}

/// A batch-derived topic cluster draft.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTopic {
    pub label: String,
    pub frequency: i64,
    pub keywords: Vec<String>,
}

/// A tracked product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub keywords: Vec<String>,
    pub track_video: bool,
    pub track_forum: bool,
    pub track_microblog: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub track_video: bool,
    #[serde(default = "default_true")]
    pub track_forum: bool,
    #[serde(default = "default_true")]
    pub track_microblog: bool,
}

fn default_true() -> bool {
    true
}

impl NewProduct {
    /// URL-safe slug derived from the product name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

// ---------------------------------------------------------------------------
// Dashboard shapes
// ---------------------------------------------------------------------------

/// Aggregation scope: the whole dataset or one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Product(i64),
}

impl Scope {
    #[must_use]
    pub fn product_id(self) -> Option<i64> {
        match self {
            Scope::Global => None,
            Scope::Product(id) => Some(id),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Product(id) => write!(f, "product:{id}"),
        }
    }
}

/// Review count per source platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCount {
    pub platform: String,
    pub count: i64,
}

/// One slice of the emotion frequency histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionSlice {
    pub emotion: String,
    pub count: i64,
    pub percentage: f64,
}

/// Mean score for one aspect category across the sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectAverage {
    pub aspect: String,
    pub score: f64,
    pub mentions: i64,
}

/// A keyword and how often it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: i64,
}

/// A recent review as surfaced on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RecentReview {
    pub text: String,
    pub source: String,
    pub author: Option<String>,
    pub score: Option<f64>,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Credibility roll-up for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredibilityReport {
    /// Mean credibility over the sample, 0–100.
    pub overall_score: f64,
    /// Sampled reviews at or above the trust threshold.
    pub verified_reviews: i64,
    /// Sampled reviews below the bot-suspicion threshold.
    pub bots_detected: i64,
}

/// One analysis row as read back for aggregation, normalized to a single
/// shape at the persistence-read boundary.
#[derive(Debug, Clone)]
pub struct AnalysisSample {
    pub score: f64,
    pub credibility: f64,
    pub emotions: Vec<EmotionWeight>,
    pub aspects: Vec<AspectScore>,
    pub created_at: DateTime<Utc>,
}

/// The cached, composite aggregate served to dashboard readers.
///
/// Field names follow the external dashboard contract (camelCase on the
/// wire). Always well-formed: a scope with no data serializes with zeroed
/// totals and empty arrays.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_reviews: i64,
    /// Mean polarity over the sample, expressed on a 0–100 scale.
    pub sentiment_score: f64,
    /// Day-over-day change of `sentiment_score`; 0.0 when the baseline
    /// period has no data.
    pub sentiment_delta: f64,
    pub average_credibility: f64,
    pub platform_breakdown: Vec<PlatformCount>,
    pub credibility_report: CredibilityReport,
    pub emotion_breakdown: Vec<EmotionSlice>,
    pub aspect_scores: Vec<AspectAverage>,
    pub top_keywords: Vec<KeywordCount>,
    pub recent_reviews: Vec<RecentReview>,
}

impl DashboardSnapshot {
    /// True when the snapshot carries no data at all. Empty snapshots are
    /// served but never cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_reviews == 0 && self.recent_reviews.is_empty()
    }
}
