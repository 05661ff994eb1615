//! Database operations for the `alerts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mentio_core::NewAlert;

use crate::DbError;

/// A row from the `alerts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRow {
    pub id: i64,
    pub product_id: Option<i64>,
    pub kind: String,
    pub message: String,
    pub severity: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert a new alert.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_alert(pool: &PgPool, alert: &NewAlert) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO alerts (product_id, kind, message, severity) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(alert.product_id)
    .bind(&alert.kind)
    .bind(&alert.message)
    .bind(alert.severity.as_str())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List alerts, newest first, optionally only unread ones.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_alerts(
    pool: &PgPool,
    unread_only: bool,
    limit: i64,
) -> Result<Vec<AlertRow>, DbError> {
    let rows = sqlx::query_as::<_, AlertRow>(
        "SELECT id, product_id, kind, message, severity, is_read, created_at \
         FROM alerts \
         WHERE ($1 = FALSE OR is_read = FALSE) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(unread_only)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Acknowledge an alert. Returns `false` when no such alert exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_alert_read(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("UPDATE alerts SET is_read = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
