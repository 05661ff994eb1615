//! Snapshot recomputation: the fixed sequence of sub-aggregations, run
//! concurrently against the store contract.

use mentio_core::{DashboardSnapshot, MentionStore, SampleWindow, Scope};

use super::math;

/// Recent reviews surfaced on the dashboard.
const RECENT_LIMIT: i64 = 10;
/// Top keywords surfaced on the dashboard.
const KEYWORD_LIMIT: i64 = 10;

/// Run all sub-aggregations for a scope and fold them into one snapshot.
///
/// Sub-aggregations have no ordering dependency and run concurrently. A
/// failure in any one of them degrades that field to its empty default
/// without aborting the others — the result is always a well-formed
/// snapshot, possibly with zeroed fields.
pub(crate) async fn compute_snapshot<S: MentionStore>(
    store: &S,
    scope: Scope,
    sample_limit: i64,
) -> DashboardSnapshot {
    let (total, sample, last_day, prior_day, platforms, recent, keywords) = tokio::join!(
        store.count_reviews(scope),
        store.sample_analyses(scope, SampleWindow::All, sample_limit),
        store.sample_analyses(scope, SampleWindow::LastDay, sample_limit),
        store.sample_analyses(scope, SampleWindow::PriorDay, sample_limit),
        store.platform_breakdown(scope),
        store.recent_reviews(scope, RECENT_LIMIT),
        store.keyword_rows(scope, KEYWORD_LIMIT),
    );

    let total_reviews = unwrap_or_default(total, scope, "review count");
    let sample = unwrap_or_default(sample, scope, "analysis sample");
    let last_day = unwrap_or_default(last_day, scope, "last-day sample");
    let prior_day = unwrap_or_default(prior_day, scope, "prior-day sample");
    let platform_breakdown = unwrap_or_default(platforms, scope, "platform breakdown");
    let recent_reviews = unwrap_or_default(recent, scope, "recent reviews");
    let top_keywords = unwrap_or_default(keywords, scope, "top keywords");

    DashboardSnapshot {
        total_reviews,
        sentiment_score: math::mean_sentiment(&sample),
        sentiment_delta: math::sentiment_delta(&last_day, &prior_day),
        average_credibility: math::mean_credibility(&sample),
        platform_breakdown,
        credibility_report: math::credibility_report(&sample),
        emotion_breakdown: math::emotion_breakdown(&sample),
        aspect_scores: math::aspect_scores(&sample),
        top_keywords,
        recent_reviews,
    }
}

fn unwrap_or_default<T: Default>(
    result: Result<T, mentio_core::StoreError>,
    scope: Scope,
    field: &'static str,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(scope = %scope, field, error = %e, "sub-aggregation degraded to default");
            T::default()
        }
    }
}
