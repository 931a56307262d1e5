//! Error types for the signaling relay.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Why a session's receive loop ended.
///
/// Disconnects are ordinary values consumed by the session lifecycle, not
/// unwinding; every variant leads to the same cleanup path.
#[derive(Error, Debug)]
pub enum SessionEnd {
    /// The peer closed the connection or the stream ended.
    #[error("connection closed")]
    Closed,

    /// Transport-level failure while receiving.
    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),

    /// The peer sent a non-text data frame; the relay is text-only.
    #[error("unsupported frame type")]
    UnsupportedFrame,
}

/// Failures while persisting an uploaded file.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Malformed multipart payload.
    #[error("invalid multipart payload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// The form carried no file field.
    #[error("missing file field")]
    MissingFile,

    /// Writing to the content store failed.
    #[error("failed to persist upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Multipart(_) | Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        // The uploader gets a generic failure; detail stays in the log.
        (self.status(), Json(json!({ "error": "file upload failed" }))).into_response()
    }
}
