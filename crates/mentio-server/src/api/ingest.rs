use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use mentio_core::Scope;

use crate::ingest::{run_ingest, IngestOutcome};
use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct IngestRequest {
    product_id: i64,
    keywords: Option<Vec<String>>,
    target_url: Option<String>,
    /// Run the scrape + pipeline as a detached task and return immediately.
    #[serde(default)]
    background: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct PerSourceCount {
    pub(super) source: String,
    pub(super) count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct IngestResponseBody {
    pub(super) status: &'static str,
    pub(super) total_scraped: usize,
    pub(super) total_saved: usize,
    pub(super) duplicates: usize,
    pub(super) filtered: usize,
    pub(super) failed: usize,
    pub(super) per_source_counts: Vec<PerSourceCount>,
}

impl IngestResponseBody {
    fn completed(outcome: &IngestOutcome) -> Self {
        Self {
            status: "completed",
            total_scraped: outcome.summary.total_scraped,
            total_saved: outcome.summary.total_saved,
            duplicates: outcome.summary.duplicates,
            filtered: outcome.summary.filtered,
            failed: outcome.summary.failed,
            per_source_counts: outcome
                .per_source
                .iter()
                .map(|c| PerSourceCount {
                    source: c.source.as_str().to_string(),
                    count: c.count,
                })
                .collect(),
        }
    }

    fn accepted() -> Self {
        Self {
            status: "accepted",
            total_scraped: 0,
            total_saved: 0,
            duplicates: 0,
            filtered: 0,
            failed: 0,
            per_source_counts: Vec::new(),
        }
    }
}

/// Trigger one ingestion run for a product.
///
/// Validation failures (unknown or inactive product) are rejected before
/// any scraping starts. With `background: true` the run is detached and
/// completes independently of this request's lifecycle.
pub(super) async fn trigger_ingest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<ApiResponse<IngestResponseBody>>, ApiError> {
    let product = mentio_db::get_product(&state.pool, request.product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("unknown product id {}", request.product_id),
            )
        })?;

    if !product.is_active {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("product '{}' is inactive", product.slug),
        ));
    }

    if request.background {
        let state = state.clone();
        let keywords = request.keywords;
        let target_url = request.target_url;
        tokio::spawn(async move {
            let outcome = run_ingest(
                &state.sources,
                &state.store,
                state.analyzer.as_ref(),
                &state.rules,
                &product,
                keywords,
                target_url,
            )
            .await;
            if outcome.summary.total_saved > 0 {
                state.stats_cache.invalidate(Scope::Product(product.id)).await;
            }
        });

        return Ok(Json(ApiResponse {
            data: IngestResponseBody::accepted(),
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let outcome = run_ingest(
        &state.sources,
        &state.store,
        state.analyzer.as_ref(),
        &state.rules,
        &product,
        request.keywords,
        request.target_url,
    )
    .await;

    if outcome.summary.total_saved > 0 {
        state.stats_cache.invalidate(Scope::Product(product.id)).await;
    }

    Ok(Json(ApiResponse {
        data: IngestResponseBody::completed(&outcome),
        meta: ResponseMeta::new(req_id.0),
    }))
}
