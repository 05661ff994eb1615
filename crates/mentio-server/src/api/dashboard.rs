use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use mentio_core::{DashboardSnapshot, Scope};

use crate::dashboard::get_stats;
use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DashboardQuery {
    pub product_id: Option<i64>,
}

/// Serve the dashboard snapshot for the requested scope.
///
/// Never a hard error: under total persistence failure the reader still
/// receives a well-formed, zeroed snapshot.
pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Json<ApiResponse<DashboardSnapshot>> {
    let scope = query.product_id.map_or(Scope::Global, Scope::Product);

    let snapshot = get_stats(
        &state.store,
        &state.stats_cache,
        scope,
        state.config.dashboard_sample_limit,
    )
    .await;

    Json(ApiResponse {
        data: snapshot,
        meta: ResponseMeta::new(req_id.0),
    })
}
