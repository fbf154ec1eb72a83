use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Multipart;
use tracing::warn;

use crate::{
    application::{
        error::backend_error_to_http,
        post_form::{PostForm, SubmitOutcome},
    },
    infra::http::{
        admin::{AdminState, HeaderIdentity},
        middleware::SubmissionSummary,
    },
};

use super::{
    editor::render_post_editor,
    errors::{payload_error_to_http, post_not_found},
    forms::read_post_form,
};

pub(crate) async fn admin_post_new(State(state): State<AdminState>) -> Response {
    let form = PostForm::mount(None);
    render_post_editor(
        &form,
        &state.posts,
        StatusCode::OK,
        "infra::http::admin_post_new",
    )
}

pub(crate) async fn admin_post_edit(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_post_edit";

    let form = match load_edit_form(&state, &id, SOURCE).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    render_post_editor(&form, &state.posts, StatusCode::OK, SOURCE)
}

pub(crate) async fn admin_post_create(
    State(state): State<AdminState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    const SOURCE: &str = "infra::http::admin_post_create";

    let input = match read_post_form(&mut multipart).await {
        Ok(input) => input,
        Err(err) => return payload_error_to_http(SOURCE, err).into_response(),
    };

    let mut form = PostForm::mount(None);
    form.apply_input(input);
    submit_and_respond(&state, &headers, form, SOURCE).await
}

pub(crate) async fn admin_post_update(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    const SOURCE: &str = "infra::http::admin_post_update";

    let input = match read_post_form(&mut multipart).await {
        Ok(input) => input,
        Err(err) => return payload_error_to_http(SOURCE, err).into_response(),
    };

    let mut form = match load_edit_form(&state, &id, SOURCE).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    form.apply_input(input);
    submit_and_respond(&state, &headers, form, SOURCE).await
}

async fn load_edit_form(
    state: &AdminState,
    id: &str,
    source: &'static str,
) -> Result<PostForm, Response> {
    match state.posts.load_post(id).await {
        Ok(Some(post)) => Ok(PostForm::mount(Some(post))),
        Ok(None) => Err(post_not_found(source, id).into_response()),
        Err(err) => Err(backend_error_to_http(source, err).into_response()),
    }
}

async fn submit_and_respond(
    state: &AdminState,
    headers: &HeaderMap,
    mut form: PostForm,
    source: &'static str,
) -> Response {
    let identity = HeaderIdentity::from_headers(headers, &state.user_header);
    let outcome = state.posts.submit(&mut form, &identity).await;
    let mut response = match &outcome {
        SubmitOutcome::Navigate(path) => {
            Redirect::to(&redirect_target(state, path)).into_response()
        }
        SubmitOutcome::Rejected | SubmitOutcome::Failed => render_post_editor(
            &form,
            &state.posts,
            StatusCode::UNPROCESSABLE_ENTITY,
            source,
        ),
        SubmitOutcome::Stayed => render_post_editor(&form, &state.posts, StatusCode::OK, source),
    };
    SubmissionSummary::new(&form, &outcome).attach(&mut response);
    response
}

/// Resolve a post path against the public site URL when one is configured.
fn redirect_target(state: &AdminState, path: &str) -> String {
    let Some(base) = state.public_url.as_ref() else {
        return path.to_string();
    };
    match base.join(path.trim_start_matches('/')) {
        Ok(url) => url.to_string(),
        Err(err) => {
            warn!(
                target = "infra::http::admin_posts",
                base = %base,
                path,
                error = %err,
                "falling back to relative redirect"
            );
            path.to_string()
        }
    }
}
