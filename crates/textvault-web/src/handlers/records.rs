use axum::extract::{Path, Query, State};
use axum::response::Html;
use std::sync::Arc;

use textvault_core::RecordId;

use crate::error::PageError;
use crate::models::SearchParams;
use crate::state::AppState;
use crate::template;

/// All records, or those matching `?q=`.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, PageError> {
    let keyword = params.keyword();
    let records = state.coordinator.search(keyword).await?;
    Ok(template::render_list(&records, keyword))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Html<String>, PageError> {
    let record = state.coordinator.get(id).await?;
    Ok(template::render_detail(&record))
}
