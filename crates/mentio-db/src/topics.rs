//! Database operations for the `topic_clusters` table.

use sqlx::PgPool;

use mentio_core::{KeywordCount, NewTopic, Scope};

use crate::DbError;

/// Insert a batch of topic clusters, optionally product-scoped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn insert_topics(
    pool: &PgPool,
    product_id: Option<i64>,
    topics: &[NewTopic],
) -> Result<(), DbError> {
    for topic in topics {
        sqlx::query(
            "INSERT INTO topic_clusters (product_id, label, frequency, keywords) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(product_id)
        .bind(&topic.label)
        .bind(topic.frequency)
        .bind(&topic.keywords)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Top keywords by summed topic frequency for a scope.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn top_keywords(
    pool: &PgPool,
    scope: Scope,
    limit: i64,
) -> Result<Vec<KeywordCount>, DbError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT label, SUM(frequency)::BIGINT AS total \
         FROM topic_clusters \
         WHERE ($1::BIGINT IS NULL OR product_id = $1) \
         GROUP BY label \
         ORDER BY total DESC, label ASC \
         LIMIT $2",
    )
    .bind(scope.product_id())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect())
}
