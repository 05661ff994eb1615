use axum::{
    extract::{Path, State},
    Extension, Json,
};

use mentio_core::{NewProduct, ProductRecord, Scope};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ProductRecord>>>, ApiError> {
    let products = mentio_db::list_active_products(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: products,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(product): Json<NewProduct>,
) -> Result<Json<ApiResponse<ProductRecord>>, ApiError> {
    if product.name.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "product name must be non-empty",
        ));
    }
    if product.slug().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "product name must contain at least one alphanumeric character",
        ));
    }

    let created = mentio_db::create_product(&state.pool, &product)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::new(
                    req_id.0.clone(),
                    "conflict",
                    format!("a product with slug '{}' already exists", product.slug()),
                )
            } else {
                map_db_error(req_id.0.clone(), &e)
            }
        })?;

    Ok(Json(ApiResponse {
        data: created,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Delete a product and everything it owns (reviews, analyses, alerts,
/// product-scoped topics). This is the only destructive operation the API
/// exposes, and it is always explicit and product-scoped.
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedBody>>, ApiError> {
    let deleted = mentio_db::delete_product_cascade(&state.pool, product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no product with id {product_id}"),
        ));
    }

    state.stats_cache.invalidate(Scope::Product(product_id)).await;

    Ok(Json(ApiResponse {
        data: DeletedBody { deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, serde::Serialize)]
pub(super) struct DeletedBody {
    pub(super) deleted: bool,
}

fn is_unique_violation(error: &mentio_db::DbError) -> bool {
    match error {
        mentio_db::DbError::Sqlx(sqlx::Error::Database(db_err)) => {
            db_err.code().as_deref() == Some("23505")
        }
        _ => false,
    }
}
