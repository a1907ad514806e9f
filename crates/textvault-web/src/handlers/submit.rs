use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;
use crate::template;
use crate::upload;

/// Form target: extract the upload or URL, store it, then go to the listing.
///
/// Failures re-render the form with the message and the mapped status.
pub async fn submit(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let mut url_value = String::new();
    match handle_submit(&state, multipart, &mut url_value).await {
        Ok(()) => Redirect::to("/records").into_response(),
        Err(e) => {
            let status = e.status();
            let message = e.public_message();
            (status, template::render_index(Some(&message), &url_value)).into_response()
        }
    }
}

async fn handle_submit(
    state: &AppState,
    multipart: Multipart,
    url_value: &mut String,
) -> Result<(), AppError> {
    let fields = upload::parse_multipart(multipart).await?;
    url_value.clone_from(&fields.url);

    let submission = fields.into_submission()?;
    let name = submission.source_name().to_string();
    let id = state.coordinator.submit(submission).await?;
    tracing::info!(id, source = %name, "submission stored");
    Ok(())
}
