use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::application::error::HttpError;

/// Render `template` as an HTML page with `status`. A template failure
/// becomes a `500` whose report names `source`.
pub fn render_page<T: Template>(template: &T, status: StatusCode, source: &'static str) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Template rendering failed",
            &err,
        )
        .into_response(),
    }
}
