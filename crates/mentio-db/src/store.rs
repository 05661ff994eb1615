//! [`MentionStore`] implementation over Postgres.
//!
//! Every call is bounded by the configured store timeout: a timed-out read
//! degrades at the caller to an empty default, a timed-out write fails that
//! item only. The pool itself is shared; `PgStore` is cheap to clone.

use std::time::Duration;

use sqlx::PgPool;

use mentio_core::{
    AnalysisSample, KeywordCount, MentionStore, NewAlert, NewReview, NewTopic, PlatformCount,
    RecentReview, SampleWindow, Scope, SentimentAnalysis, StoreError, StoredReview,
};

use crate::{aggregates, alerts, products, reviews, topics, DbError};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool, timeout_secs: u64) -> Self {
        Self {
            pool,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: std::future::Future<Output = Result<T, DbError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(map_db_error),
            Err(_) => Err(StoreError::Timeout),
        }
    }
}

fn map_db_error(error: DbError) -> StoreError {
    match error {
        DbError::Sqlx(sqlx::Error::PoolTimedOut) => StoreError::Timeout,
        DbError::Sqlx(sqlx::Error::Io(e)) => StoreError::Unavailable(e.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

impl MentionStore for PgStore {
    async fn find_review_by_fingerprint(
        &self,
        product_id: i64,
        fingerprint: &str,
    ) -> Result<Option<StoredReview>, StoreError> {
        self.bounded(reviews::find_review_by_fingerprint(
            &self.pool,
            product_id,
            fingerprint,
        ))
        .await
    }

    async fn insert_review(&self, review: NewReview) -> Result<Option<StoredReview>, StoreError> {
        self.bounded(reviews::insert_review(&self.pool, &review)).await
    }

    async fn insert_analysis(
        &self,
        review_id: i64,
        analysis: &SentimentAnalysis,
    ) -> Result<(), StoreError> {
        self.bounded(reviews::insert_analysis(&self.pool, review_id, analysis))
            .await
    }

    async fn insert_alert(&self, alert: NewAlert) -> Result<(), StoreError> {
        self.bounded(async {
            alerts::insert_alert(&self.pool, &alert).await?;
            Ok(())
        })
        .await
    }

    async fn insert_topics(
        &self,
        product_id: Option<i64>,
        new_topics: &[NewTopic],
    ) -> Result<(), StoreError> {
        self.bounded(topics::insert_topics(&self.pool, product_id, new_topics))
            .await
    }

    async fn count_reviews(&self, scope: Scope) -> Result<i64, StoreError> {
        self.bounded(aggregates::count_reviews(&self.pool, scope)).await
    }

    async fn sample_analyses(
        &self,
        scope: Scope,
        window: SampleWindow,
        limit: i64,
    ) -> Result<Vec<AnalysisSample>, StoreError> {
        self.bounded(aggregates::sample_analyses(&self.pool, scope, window, limit))
            .await
    }

    async fn platform_breakdown(&self, scope: Scope) -> Result<Vec<PlatformCount>, StoreError> {
        self.bounded(aggregates::platform_breakdown(&self.pool, scope))
            .await
    }

    async fn recent_reviews(
        &self,
        scope: Scope,
        limit: i64,
    ) -> Result<Vec<RecentReview>, StoreError> {
        self.bounded(aggregates::recent_reviews(&self.pool, scope, limit))
            .await
    }

    async fn keyword_rows(&self, scope: Scope, limit: i64) -> Result<Vec<KeywordCount>, StoreError> {
        self.bounded(topics::top_keywords(&self.pool, scope, limit))
            .await
    }

    async fn delete_product_cascade(&self, product_id: i64) -> Result<(), StoreError> {
        self.bounded(async {
            products::delete_product_cascade(&self.pool, product_id).await?;
            Ok(())
        })
        .await
    }
}
