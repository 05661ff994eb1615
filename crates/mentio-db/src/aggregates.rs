//! Aggregate queries backing the dashboard.
//!
//! Every reader here normalizes its rows to the core shapes at the
//! persistence-read boundary — in particular, a review's maybe-present
//! analysis comes back as a fully-shaped [`AnalysisSample`] or not at all,
//! never as a half-parsed blob for aggregation code to poke at.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use mentio_core::{
    AnalysisSample, AspectScore, EmotionWeight, PlatformCount, RecentReview, SampleWindow, Scope,
};

use crate::DbError;

/// Count reviews in scope.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_reviews(pool: &PgPool, scope: Scope) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reviews WHERE ($1::BIGINT IS NULL OR product_id = $1)",
    )
    .bind(scope.product_id())
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[derive(Debug, sqlx::FromRow)]
struct SampleRow {
    score: f64,
    credibility: f64,
    emotions: Value,
    aspects: Value,
    created_at: DateTime<Utc>,
}

impl From<SampleRow> for AnalysisSample {
    fn from(row: SampleRow) -> Self {
        AnalysisSample {
            score: row.score,
            credibility: row.credibility,
            emotions: parse_list::<EmotionWeight>(row.emotions, "emotions"),
            aspects: parse_list::<AspectScore>(row.aspects, "aspects"),
            created_at: row.created_at,
        }
    }
}

/// Decode a JSONB list column, degrading to empty on malformed data rather
/// than failing the whole aggregation.
fn parse_list<T: serde::de::DeserializeOwned>(value: Value, column: &str) -> Vec<T> {
    match serde_json::from_value(value) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(column, error = %e, "malformed JSONB list; treating as empty");
            Vec::new()
        }
    }
}

/// Sample analyses for aggregation, newest first, bounded by `limit`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sample_analyses(
    pool: &PgPool,
    scope: Scope,
    window: SampleWindow,
    limit: i64,
) -> Result<Vec<AnalysisSample>, DbError> {
    let window_clause = match window {
        SampleWindow::All => "",
        SampleWindow::LastDay => "AND sa.created_at >= NOW() - INTERVAL '24 hours' ",
        SampleWindow::PriorDay => {
            "AND sa.created_at >= NOW() - INTERVAL '48 hours' \
             AND sa.created_at < NOW() - INTERVAL '24 hours' "
        }
    };

    let rows = sqlx::query_as::<_, SampleRow>(&format!(
        "SELECT sa.score, sa.credibility, sa.emotions, sa.aspects, sa.created_at \
         FROM sentiment_analyses sa \
         JOIN reviews r ON r.id = sa.review_id \
         WHERE ($1::BIGINT IS NULL OR r.product_id = $1) \
         {window_clause}\
         ORDER BY sa.created_at DESC, sa.id DESC \
         LIMIT $2"
    ))
    .bind(scope.product_id())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Review counts per source platform, largest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn platform_breakdown(pool: &PgPool, scope: Scope) -> Result<Vec<PlatformCount>, DbError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT source, COUNT(*)::BIGINT AS total \
         FROM reviews \
         WHERE ($1::BIGINT IS NULL OR product_id = $1) \
         GROUP BY source \
         ORDER BY total DESC, source ASC",
    )
    .bind(scope.product_id())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(platform, count)| PlatformCount { platform, count })
        .collect())
}

#[derive(Debug, sqlx::FromRow)]
struct RecentRow {
    body: String,
    source: String,
    author: Option<String>,
    score: Option<f64>,
    label: Option<String>,
    created_at: DateTime<Utc>,
}

/// Most recent reviews with their analysis, when one exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_reviews(
    pool: &PgPool,
    scope: Scope,
    limit: i64,
) -> Result<Vec<RecentReview>, DbError> {
    let rows = sqlx::query_as::<_, RecentRow>(
        "SELECT r.body, r.source, r.author, sa.score, sa.label, r.created_at \
         FROM reviews r \
         LEFT JOIN sentiment_analyses sa ON sa.review_id = r.id \
         WHERE ($1::BIGINT IS NULL OR r.product_id = $1) \
         ORDER BY r.created_at DESC, r.id DESC \
         LIMIT $2",
    )
    .bind(scope.product_id())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RecentReview {
            text: row.body,
            source: row.source,
            author: row.author,
            score: row.score,
            label: row.label,
            created_at: row.created_at,
        })
        .collect())
}
