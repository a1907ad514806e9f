use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use textvault_core::{CoreError, RecordId, Submission};

use crate::error::AppError;
use crate::models::{CreateRecordRequest, CreatedJson, RecordJson, RecordSummaryJson, SearchParams};
use crate::state::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<RecordSummaryJson>>, AppError> {
    let records = state.coordinator.search(params.keyword()).await?;
    Ok(Json(records.iter().map(RecordSummaryJson::from).collect()))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<RecordJson>, AppError> {
    let record = state.coordinator.get(id).await?;
    Ok(Json(record.into()))
}

/// Fetch a URL and store its text. PDFs go through the form route.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<CreatedJson>), AppError> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(CoreError::InvalidInput("url must not be empty".into()).into());
    }
    let id = state.coordinator.submit(Submission::Url(url.to_string())).await?;
    Ok((StatusCode::CREATED, Json(CreatedJson { id })))
}
