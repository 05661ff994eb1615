use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use mentio_core::SentimentAnalysis;
use mentio_sentiment::{fingerprint, normalize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    text: String,
}

/// Ad hoc analysis of one text, bypassing persistence entirely. Still goes
/// through the engine's result cache, so repeated identical text is
/// computed once.
pub(super) async fn analyze_text(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<SentimentAnalysis>>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "text must be non-empty",
        ));
    }

    let Some(cleaned) = normalize(&request.text) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "text has no linguistic content after normalization",
        ));
    };

    let analysis = state.analyzer.analyze(&fingerprint(&cleaned), &cleaned).await;

    Ok(Json(ApiResponse {
        data: analysis,
        meta: ResponseMeta::new(req_id.0),
    }))
}
