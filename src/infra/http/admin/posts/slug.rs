//! Live slug previews requested by the editor while typing.

use std::convert::Infallible;

use async_stream::stream;
use axum::{
    Json,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use datastar::prelude::PatchSignals;
use serde::Deserialize;
use serde_json::json;

use crate::application::post_form::PostForm;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SlugSignals {
    title: String,
    slug: String,
}

/// Title input: the slug follows the title.
pub(crate) async fn admin_post_slug_from_title(Json(signals): Json<SlugSignals>) -> Response {
    let mut form = PostForm::mount(None);
    form.input_title(signals.title);
    slug_patch(&form)
}

/// Slug input: the typed value is normalised in place.
pub(crate) async fn admin_post_slug_manual(Json(signals): Json<SlugSignals>) -> Response {
    let mut form = PostForm::mount(None);
    form.input_slug(&signals.slug);
    slug_patch(&form)
}

/// One datastar signal patch carrying the form's current slug.
fn slug_patch(form: &PostForm) -> Response {
    let payload = json!({ "slug": form.values().slug }).to_string();
    let event = PatchSignals::new(payload.as_str()).write_as_axum_sse_event();
    Sse::new(stream! {
        yield Ok::<Event, Infallible>(event);
    })
    .into_response()
}
