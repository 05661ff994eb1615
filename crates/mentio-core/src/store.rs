//! The narrow persistence contract the ingestion and aggregation core
//! depends on.
//!
//! The datastore is an external collaborator: the pipeline and the dashboard
//! talk to it only through [`MentionStore`]. `mentio-db` provides the
//! Postgres implementation; tests use an in-memory one.

use thiserror::Error;

use crate::domain::{
    AnalysisSample, KeywordCount, NewAlert, NewReview, NewTopic, PlatformCount, RecentReview,
    Scope, SentimentAnalysis, StoredReview,
};

/// Errors surfaced by a [`MentionStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The call exceeded its time bound. Readers degrade to empty defaults;
    /// writers fail the affected item only.
    #[error("datastore call timed out")]
    Timeout,
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
    #[error("datastore query failed: {0}")]
    Query(String),
}

/// Time window for aggregate sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWindow {
    /// No time bound (still sample-limited).
    All,
    /// The most recent 24 hours.
    LastDay,
    /// The 24 hours before [`SampleWindow::LastDay`].
    PriorDay,
}

/// Read/write contract over the persistent mention dataset.
///
/// Used generically (not as a trait object), so the native `async fn` form
/// is sufficient here.
#[allow(async_fn_in_trait)]
pub trait MentionStore: Send + Sync {
    /// Look up a review by its content fingerprint within a product scope.
    async fn find_review_by_fingerprint(
        &self,
        product_id: i64,
        fingerprint: &str,
    ) -> Result<Option<StoredReview>, StoreError>;

    /// Insert a review. Returns `None` when a review with the same
    /// fingerprint already exists in the product scope (a no-op, not an
    /// error).
    async fn insert_review(&self, review: NewReview) -> Result<Option<StoredReview>, StoreError>;

    /// Attach the one-and-only analysis to a review.
    async fn insert_analysis(
        &self,
        review_id: i64,
        analysis: &SentimentAnalysis,
    ) -> Result<(), StoreError>;

    async fn insert_alert(&self, alert: NewAlert) -> Result<(), StoreError>;

    /// Record batch-derived topic clusters, optionally product-scoped.
    async fn insert_topics(
        &self,
        product_id: Option<i64>,
        topics: &[NewTopic],
    ) -> Result<(), StoreError>;

    async fn count_reviews(&self, scope: Scope) -> Result<i64, StoreError>;

    /// Bounded sample of analyses for aggregation, newest first, normalized
    /// to [`AnalysisSample`] at the read boundary.
    async fn sample_analyses(
        &self,
        scope: Scope,
        window: SampleWindow,
        limit: i64,
    ) -> Result<Vec<AnalysisSample>, StoreError>;

    async fn platform_breakdown(&self, scope: Scope) -> Result<Vec<PlatformCount>, StoreError>;

    async fn recent_reviews(
        &self,
        scope: Scope,
        limit: i64,
    ) -> Result<Vec<RecentReview>, StoreError>;

    /// Keyword/topic source rows for the dashboard's top-keywords panel.
    async fn keyword_rows(&self, scope: Scope, limit: i64) -> Result<Vec<KeywordCount>, StoreError>;

    /// Remove a product together with its reviews, analyses, alerts, and
    /// product-scoped topics. The only destructive operation in the
    /// contract, and always explicit.
    async fn delete_product_cascade(&self, product_id: i64) -> Result<(), StoreError>;
}
