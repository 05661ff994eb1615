//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use mentio_core::{NewProduct, ProductRecord};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    public_id: Uuid,
    name: String,
    slug: String,
    keywords: Vec<String>,
    track_video: bool,
    track_forum: bool,
    track_microblog: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        ProductRecord {
            id: row.id,
            public_id: row.public_id,
            name: row.name,
            slug: row.slug,
            keywords: row.keywords,
            track_video: row.track_video,
            track_forum: row.track_forum,
            track_microblog: row.track_microblog,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, public_id, name, slug, keywords, track_video, track_forum, \
                               track_microblog, is_active, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a new product and return the stored record.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a slug
/// collision, surfaced as a unique-constraint violation).
pub async fn create_product(pool: &PgPool, product: &NewProduct) -> Result<ProductRecord, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "INSERT INTO products \
             (public_id, name, slug, keywords, track_video, track_forum, track_microblog) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&product.name)
    .bind(product.slug())
    .bind(&product.keywords)
    .bind(product.track_video)
    .bind(product.track_forum)
    .bind(product.track_microblog)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// List all active products, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_products(pool: &PgPool) -> Result<Vec<ProductRecord>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE is_active = TRUE \
         ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Fetch one product by internal id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<ProductRecord>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}

/// Fetch one product by slug.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<ProductRecord>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}

/// Delete a product. Reviews, analyses, alerts, and product-scoped topics
/// cascade at the schema level. Returns `true` if a row was deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_product_cascade(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
