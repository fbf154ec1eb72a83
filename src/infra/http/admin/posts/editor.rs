use axum::{http::StatusCode, response::Response};
use serde_json::json;

use crate::application::error::ErrorReport;
use crate::application::post_form::{Field, FormMode, PostForm, PostFormService};
use crate::domain::posts::ACCEPTED_IMAGE_TYPES;
use crate::domain::types::PostStatus;
use crate::presentation::{
    admin::views::{
        AdminMetaView, ImagePreviewView, PostEditorTemplate, PostEditorView, StatusOptionView,
    },
    views::render_page,
};

const SLUG_FROM_TITLE_ACTION: &str = "/posts/slug/title";
const SLUG_MANUAL_ACTION: &str = "/posts/slug/manual";

pub(super) fn build_post_editor_view(form: &PostForm, service: &PostFormService) -> PostEditorView {
    let values = form.values();
    let errors = form.field_errors();
    let field_error = |field: Field| errors.get(field).map(str::to_string);

    let (heading, form_action, submit_label) = match form.mode() {
        FormMode::Edit(post) => ("Edit post", format!("/posts/{}/edit", post.id), "Update"),
        FormMode::Create => ("New post", "/posts/new".to_string(), "Submit"),
    };

    let preview = form.post().and_then(|post| {
        service
            .featured_image_url(post)
            .map(|url| ImagePreviewView {
                src: url.to_string(),
                alt: post.title.clone(),
            })
    });

    let status_options = PostStatus::ALL
        .iter()
        .map(|status| StatusOptionView {
            value: status.as_str(),
            label: status.label(),
            selected: status.as_str() == values.status,
        })
        .collect();

    PostEditorView {
        heading,
        form_action,
        submit_label,
        error: form.error().map(str::to_string),
        title: values.title.clone(),
        title_error: field_error(Field::Title),
        slug: values.slug.clone(),
        slug_error: field_error(Field::Slug),
        content: values.content.clone(),
        status_options,
        status_error: field_error(Field::Status),
        image_required: matches!(form.mode(), FormMode::Create),
        image_accept: ACCEPTED_IMAGE_TYPES.join(", "),
        image_error: field_error(Field::Image),
        preview,
        signals: json!({ "title": values.title, "slug": values.slug }).to_string(),
        slug_from_title_action: SLUG_FROM_TITLE_ACTION,
        slug_manual_action: SLUG_MANUAL_ACTION,
    }
}

pub(super) fn render_post_editor(
    form: &PostForm,
    service: &PostFormService,
    status: StatusCode,
    source: &'static str,
) -> Response {
    let content = build_post_editor_view(form, service);
    let template = PostEditorTemplate {
        meta: AdminMetaView {
            title: content.heading.to_string(),
        },
        content,
    };
    let mut response = render_page(&template, status, source);
    if response.status().is_client_error() {
        let detail = form
            .error()
            .map(str::to_string)
            .or_else(|| {
                form.field_errors()
                    .iter()
                    .next()
                    .map(|(field, message)| format!("{}: {message}", field.name()))
            })
            .unwrap_or_else(|| "post form rejected".to_string());
        ErrorReport::from_message(source, status, detail).attach(&mut response);
    }
    response
}
