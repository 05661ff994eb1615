//! Database operations for the `reviews` and `sentiment_analyses` tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mentio_core::{NewReview, SentimentAnalysis, StoredReview};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    product_id: i64,
    fingerprint: String,
    body: String,
    source: String,
    author: Option<String>,
    url: Option<String>,
    posted_at: Option<DateTime<Utc>>,
    likes: i64,
    replies: i64,
    reposts: i64,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for StoredReview {
    fn from(row: ReviewRow) -> Self {
        StoredReview {
            id: row.id,
            product_id: row.product_id,
            fingerprint: row.fingerprint,
            text: row.body,
            source: row.source,
            author: row.author,
            url: row.url,
            posted_at: row.posted_at,
            likes: row.likes,
            replies: row.replies,
            reposts: row.reposts,
            created_at: row.created_at,
        }
    }
}

const REVIEW_COLUMNS: &str = "id, product_id, fingerprint, body, source, author, url, \
                              posted_at, likes, replies, reposts, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Look up a review by content fingerprint within a product scope.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_review_by_fingerprint(
    pool: &PgPool,
    product_id: i64,
    fingerprint: &str,
) -> Result<Option<StoredReview>, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE product_id = $1 AND fingerprint = $2"
    ))
    .bind(product_id)
    .bind(fingerprint)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}

/// Insert a review, treating a fingerprint collision within the product
/// scope as a no-op.
///
/// Returns `None` when the `ON CONFLICT DO NOTHING` clause swallowed the
/// insert — the caller counts that as a duplicate, not an error. This keeps
/// re-ingestion idempotent even when two concurrent batches race past the
/// fingerprint pre-check.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails for any other reason.
pub async fn insert_review(
    pool: &PgPool,
    review: &NewReview,
) -> Result<Option<StoredReview>, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "INSERT INTO reviews \
             (product_id, fingerprint, body, source, author, url, posted_at, \
              likes, replies, reposts) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT ON CONSTRAINT reviews_product_fingerprint_key DO NOTHING \
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review.product_id)
    .bind(&review.fingerprint)
    .bind(&review.text)
    .bind(review.source.as_str())
    .bind(&review.author)
    .bind(&review.url)
    .bind(review.posted_at)
    .bind(review.likes)
    .bind(review.replies)
    .bind(review.reposts)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}

/// Attach the one-and-only analysis to a review. The `review_id` unique
/// constraint enforces the one-to-one ownership; reanalysis would create a
/// new review, never mutate this row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_analysis(
    pool: &PgPool,
    review_id: i64,
    analysis: &SentimentAnalysis,
) -> Result<(), DbError> {
    let emotions = serde_json::to_value(&analysis.emotions).unwrap_or_default();
    let aspects = serde_json::to_value(&analysis.aspects).unwrap_or_default();

    sqlx::query(
        "INSERT INTO sentiment_analyses \
             (review_id, label, score, emotions, credibility, credibility_reasons, aspects) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(review_id)
    .bind(analysis.label.as_str())
    .bind(analysis.score)
    .bind(emotions)
    .bind(analysis.credibility)
    .bind(&analysis.credibility_reasons)
    .bind(aspects)
    .execute(pool)
    .await?;

    Ok(())
}
