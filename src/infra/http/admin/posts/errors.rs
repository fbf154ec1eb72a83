use axum::http::StatusCode;
use axum_extra::extract::multipart::MultipartError;
use thiserror::Error;

use crate::application::error::HttpError;

#[derive(Debug, Error)]
pub(super) enum PostFormPayloadError {
    #[error("invalid multipart form data: {0}")]
    InvalidFormData(String),
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,
}

impl PostFormPayloadError {
    pub(super) fn from_multipart(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::InvalidFormData(err.body_text())
        }
    }
}

pub(super) fn payload_error_to_http(source: &'static str, err: PostFormPayloadError) -> HttpError {
    match err {
        PostFormPayloadError::InvalidFormData(_) => HttpError::from_error(
            source,
            StatusCode::BAD_REQUEST,
            "Invalid form data",
            &err,
        ),
        PostFormPayloadError::PayloadTooLarge => HttpError::from_error(
            source,
            StatusCode::PAYLOAD_TOO_LARGE,
            "Upload exceeds the configured limit",
            &err,
        ),
    }
}

pub(super) fn post_not_found(source: &'static str, id: &str) -> HttpError {
    HttpError::new(
        source,
        StatusCode::NOT_FOUND,
        "Post not found",
        format!("post `{id}` does not exist"),
    )
}
