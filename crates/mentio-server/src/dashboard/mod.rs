//! The dashboard aggregation cache.
//!
//! Serves a fresh-enough cached snapshot per scope (bounded staleness), and
//! recomputes on miss via concurrent sub-aggregations against the store
//! contract. Only non-empty snapshots are cached: a transient empty result
//! must not poison a scope for the full TTL window.

mod cache;
mod compute;
mod math;

pub use cache::StatsCache;

use mentio_core::{DashboardSnapshot, MentionStore, Scope};

use compute::compute_snapshot;

/// Serve the dashboard snapshot for a scope.
///
/// Cache hit within the TTL returns the cached snapshot verbatim. On miss
/// the snapshot is recomputed; failures degrade per-field, and an empty
/// result is returned (well-formed) but not cached.
pub async fn get_stats<S: MentionStore>(
    store: &S,
    cache: &StatsCache,
    scope: Scope,
    sample_limit: i64,
) -> DashboardSnapshot {
    if let Some(hit) = cache.get(scope).await {
        tracing::debug!(scope = %scope, "dashboard cache hit");
        return hit;
    }

    let snapshot = compute_snapshot(store, scope, sample_limit).await;

    if snapshot.is_empty() {
        tracing::debug!(scope = %scope, "empty snapshot computed; not caching");
    } else {
        cache.put(scope, snapshot.clone()).await;
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use chrono::Utc;

    use mentio_core::{
        AnalysisSample, KeywordCount, NewAlert, NewReview, NewTopic, PlatformCount, RecentReview,
        SampleWindow, SentimentAnalysis, StoreError, StoredReview,
    };

    /// Store stub that counts recomputations and can fail selected reads.
    #[derive(Default)]
    struct ScriptedStore {
        total: i64,
        compute_count: AtomicU32,
        fail_count_reviews: bool,
    }

    impl ScriptedStore {
        fn with_total(total: i64) -> Self {
            Self {
                total,
                ..Self::default()
            }
        }
    }

    impl MentionStore for ScriptedStore {
        async fn find_review_by_fingerprint(
            &self,
            _product_id: i64,
            _fingerprint: &str,
        ) -> Result<Option<StoredReview>, StoreError> {
            Ok(None)
        }

        async fn insert_review(
            &self,
            _review: NewReview,
        ) -> Result<Option<StoredReview>, StoreError> {
            Err(StoreError::Unavailable("read-only stub".to_string()))
        }

        async fn insert_analysis(
            &self,
            _review_id: i64,
            _analysis: &SentimentAnalysis,
        ) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert_alert(&self, _alert: NewAlert) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert_topics(
            &self,
            _product_id: Option<i64>,
            _topics: &[NewTopic],
        ) -> Result<(), StoreError> {
            Ok(())
        }

        async fn count_reviews(&self, _scope: Scope) -> Result<i64, StoreError> {
            self.compute_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_count_reviews {
                return Err(StoreError::Timeout);
            }
            Ok(self.total)
        }

        async fn sample_analyses(
            &self,
            _scope: Scope,
            _window: SampleWindow,
            _limit: i64,
        ) -> Result<Vec<AnalysisSample>, StoreError> {
            Ok(vec![AnalysisSample {
                score: 0.8,
                credibility: 80.0,
                emotions: vec![],
                aspects: vec![],
                created_at: Utc::now(),
            }])
        }

        async fn platform_breakdown(
            &self,
            _scope: Scope,
        ) -> Result<Vec<PlatformCount>, StoreError> {
            Ok(vec![PlatformCount {
                platform: "forum".to_string(),
                count: self.total,
            }])
        }

        async fn recent_reviews(
            &self,
            _scope: Scope,
            _limit: i64,
        ) -> Result<Vec<RecentReview>, StoreError> {
            Ok(vec![RecentReview {
                text: "great battery".to_string(),
                source: "forum".to_string(),
                author: None,
                score: Some(0.8),
                label: Some("positive".to_string()),
                created_at: Utc::now(),
            }])
        }

        async fn keyword_rows(
            &self,
            _scope: Scope,
            _limit: i64,
        ) -> Result<Vec<KeywordCount>, StoreError> {
            Ok(Vec::new())
        }

        async fn delete_product_cascade(&self, _product_id: i64) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Store with no data at all: every read returns its empty default.
    struct EmptyStore;

    impl MentionStore for EmptyStore {
        async fn find_review_by_fingerprint(
            &self,
            _product_id: i64,
            _fingerprint: &str,
        ) -> Result<Option<StoredReview>, StoreError> {
            Ok(None)
        }

        async fn insert_review(
            &self,
            _review: NewReview,
        ) -> Result<Option<StoredReview>, StoreError> {
            Ok(None)
        }

        async fn insert_analysis(
            &self,
            _review_id: i64,
            _analysis: &SentimentAnalysis,
        ) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert_alert(&self, _alert: NewAlert) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert_topics(
            &self,
            _product_id: Option<i64>,
            _topics: &[NewTopic],
        ) -> Result<(), StoreError> {
            Ok(())
        }

        async fn count_reviews(&self, _scope: Scope) -> Result<i64, StoreError> {
            Ok(0)
        }

        async fn sample_analyses(
            &self,
            _scope: Scope,
            _window: SampleWindow,
            _limit: i64,
        ) -> Result<Vec<AnalysisSample>, StoreError> {
            Ok(Vec::new())
        }

        async fn platform_breakdown(
            &self,
            _scope: Scope,
        ) -> Result<Vec<PlatformCount>, StoreError> {
            Ok(Vec::new())
        }

        async fn recent_reviews(
            &self,
            _scope: Scope,
            _limit: i64,
        ) -> Result<Vec<RecentReview>, StoreError> {
            Ok(Vec::new())
        }

        async fn keyword_rows(
            &self,
            _scope: Scope,
            _limit: i64,
        ) -> Result<Vec<KeywordCount>, StoreError> {
            Ok(Vec::new())
        }

        async fn delete_product_cascade(&self, _product_id: i64) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn second_call_within_ttl_serves_the_cached_snapshot() {
        let store = ScriptedStore::with_total(12);
        let cache = StatsCache::new(Duration::from_secs(60));

        let first = get_stats(&store, &cache, Scope::Global, 200).await;
        let second = get_stats(&store, &cache, Scope::Global, 200).await;

        assert_eq!(
            store.compute_count.load(Ordering::SeqCst),
            1,
            "second call must not recompute"
        );
        let first_json = serde_json::to_string(&first).expect("serialize");
        let second_json = serde_json::to_string(&second).expect("serialize");
        assert_eq!(first_json, second_json, "cached snapshot served verbatim");
    }

    #[tokio::test]
    async fn call_after_ttl_expiry_recomputes() {
        let store = ScriptedStore::with_total(12);
        let cache = StatsCache::new(Duration::from_millis(20));

        get_stats(&store, &cache, Scope::Global, 200).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        get_stats(&store, &cache, Scope::Global, 200).await;

        assert_eq!(
            store.compute_count.load(Ordering::SeqCst),
            2,
            "expired entry must trigger recomputation"
        );
    }

    #[tokio::test]
    async fn empty_snapshot_is_served_but_never_cached() {
        let store = EmptyStore;
        let cache = StatsCache::new(Duration::from_secs(60));

        let snapshot = get_stats(&store, &cache, Scope::Product(9), 200).await;

        assert_eq!(snapshot.total_reviews, 0);
        assert!(snapshot.platform_breakdown.is_empty());
        assert!(snapshot.emotion_breakdown.is_empty());
        assert!(snapshot.recent_reviews.is_empty());
        assert_eq!(snapshot.sentiment_delta, 0.0);
        assert!(
            cache.get(Scope::Product(9)).await.is_none(),
            "empty snapshot must not poison the cache"
        );
    }

    #[tokio::test]
    async fn failed_sub_aggregation_degrades_that_field_only() {
        let store = ScriptedStore {
            total: 3,
            fail_count_reviews: true,
            ..ScriptedStore::default()
        };
        let cache = StatsCache::new(Duration::from_secs(60));

        let snapshot = get_stats(&store, &cache, Scope::Global, 200).await;

        assert_eq!(snapshot.total_reviews, 0, "failed field degrades to zero");
        assert!(
            !snapshot.recent_reviews.is_empty(),
            "other sub-aggregations still populate"
        );
        assert!(snapshot.sentiment_score > 0.0);
    }
}
