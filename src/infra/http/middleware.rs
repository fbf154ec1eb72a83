use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::{
    error::ErrorReport,
    post_form::{PostForm, SubmitOutcome},
};

const TARGET: &str = "megablog::http::response";

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

/// What a post form submission did, attached to its response.
#[derive(Debug, Clone)]
pub struct SubmissionSummary {
    pub mode: &'static str,
    pub post_id: Option<String>,
    pub outcome: &'static str,
    pub form_error: Option<String>,
}

impl SubmissionSummary {
    pub fn new(form: &PostForm, outcome: &SubmitOutcome) -> Self {
        Self {
            mode: form.mode().label(),
            post_id: form.post().map(|post| post.id.clone()),
            outcome: outcome.label(),
            form_error: form.error().map(str::to_string),
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Give every request an id and echo it back in `x-request-id`.
pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    request.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Log failed requests with their error chain, and every post form
/// submission with its mode and outcome. `user_header` is the identity
/// header set by the auth proxy; only its presence is logged.
pub async fn log_responses(
    State(user_header): State<HeaderName>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let signed_in = request.headers().contains_key(&user_header);
    let start = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();
    let submission = response.extensions_mut().remove::<SubmissionSummary>();
    let mode = submission.as_ref().map(|s| s.mode);
    let post_id = submission.as_ref().and_then(|s| s.post_id.clone());
    let outcome = submission.as_ref().map(|s| s.outcome);
    let form_error = submission.as_ref().and_then(|s| s.form_error.clone());

    if !status.is_client_error() && !status.is_server_error() {
        if submission.is_some() {
            let location = response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            info!(
                target = TARGET,
                status = status.as_u16(),
                path = %path,
                mode = ?mode,
                post_id = ?post_id,
                outcome = ?outcome,
                location = ?location,
                signed_in,
                elapsed_ms,
                request_id = %request_id,
                "post form submitted",
            );
        }
        return response;
    }

    let report = response.extensions_mut().remove::<ErrorReport>();
    let (source, messages) = match report {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = form_error
        .clone()
        .or_else(|| messages.first().cloned())
        .unwrap_or_else(|| "no diagnostic available".to_string());

    if status.is_server_error() {
        error!(
            target = TARGET,
            status = status.as_u16(),
            method = %method,
            path = %path,
            source,
            detail = %detail,
            chain = ?messages,
            mode = ?mode,
            post_id = ?post_id,
            signed_in,
            elapsed_ms,
            request_id = %request_id,
            "request failed",
        );
    } else {
        warn!(
            target = TARGET,
            status = status.as_u16(),
            method = %method,
            path = %path,
            source,
            detail = %detail,
            chain = ?messages,
            mode = ?mode,
            post_id = ?post_id,
            outcome = ?outcome,
            signed_in,
            elapsed_ms,
            request_id = %request_id,
            "client request error",
        );
    }

    response
}
