use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};
use tumorscope_core::{ErrorBody, SampleError};
use tumorscope_model::ModelError;

/// Everything `/predict` can fail with.
///
/// Problems with the uploaded file are client errors; failures inside the
/// model pipeline are server errors. The message always goes back to the
/// caller as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file uploaded.")]
    NoFile,

    #[error("File must be a CSV.")]
    NotCsv,

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error("{message}")]
    Upload { status: StatusCode, message: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("prediction worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFile | Self::NotCsv | Self::Sample(_) => StatusCode::BAD_REQUEST,
            Self::Upload { status, .. } => *status,
            Self::Model(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Upload {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "prediction failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "rejected upload");
        }
        (status, Json(ErrorBody::new(message))).into_response()
    }
}
