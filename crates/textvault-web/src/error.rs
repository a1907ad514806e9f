use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use textvault_core::CoreError;

use crate::models::ErrorJson;
use crate::template;

/// Everything a handler can fail with.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Core(e) => match e {
                CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                CoreError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CoreError::Fetch { .. } => StatusCode::BAD_GATEWAY,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::Storage(_) | CoreError::Io(_) | CoreError::Task(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Multipart(e) => e.status(),
        }
    }

    /// Message safe to show to the client. Internal failures are logged and
    /// replaced with a generic message.
    pub fn public_message(&self) -> String {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(error = %self, "request failed");
            return "internal error, see server log".to_string();
        }
        self.to_string()
    }
}

/// JSON error body for the API routes.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorJson {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// [`AppError`] rendered as an HTML error page.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<CoreError> for PageError {
    fn from(e: CoreError) -> Self {
        PageError(AppError::Core(e))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let message = self.0.public_message();
        (status, template::render_error(status, &message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textvault_core::{BackendError, FetchError};

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (CoreError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (
                CoreError::Extraction(BackendError::OpenError("x".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CoreError::Fetch {
                    url: "http://bad.invalid".into(),
                    source: FetchError::Timeout,
                },
                StatusCode::BAD_GATEWAY,
            ),
            (CoreError::NotFound(9), StatusCode::NOT_FOUND),
            (
                CoreError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::from(CoreError::Io(std::io::Error::other("/secret/path")));
        assert!(!err.public_message().contains("/secret/path"));
    }

    #[test]
    fn fetch_failures_are_explained() {
        let err = AppError::from(CoreError::Fetch {
            url: "http://bad.invalid".into(),
            source: FetchError::Status(404),
        });
        let msg = err.public_message();
        assert!(msg.contains("http://bad.invalid"));
        assert!(msg.contains("404"));
    }
}
