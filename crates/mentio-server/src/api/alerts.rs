use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct AlertItem {
    pub id: i64,
    pub product_id: Option<i64>,
    pub kind: String,
    pub message: String,
    pub severity: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlertsQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

pub(super) async fn list_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<ApiResponse<Vec<AlertItem>>>, ApiError> {
    let rows = mentio_db::list_alerts(
        &state.pool,
        query.unread_only,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| AlertItem {
            id: row.id,
            product_id: row.product_id,
            kind: row.kind,
            message: row.message,
            severity: row.severity,
            is_read: row.is_read,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(super) struct AckBody {
    pub acknowledged: bool,
}

pub(super) async fn mark_read(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(alert_id): Path<i64>,
) -> Result<Json<ApiResponse<AckBody>>, ApiError> {
    let acknowledged = mentio_db::mark_alert_read(&state.pool, alert_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !acknowledged {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no alert with id {alert_id}"),
        ));
    }

    Ok(Json(ApiResponse {
        data: AckBody { acknowledged: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}
