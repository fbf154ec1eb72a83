//! Multipart parsing for the post editor form.

use axum_extra::extract::Multipart;
use tracing::debug;

use super::errors::PostFormPayloadError;
use crate::application::post_form::PostFormInput;
use crate::domain::posts::ImageUpload;

const SOURCE: &str = "infra::http::admin_posts::forms";

/// Collect the editor fields from a multipart body.
///
/// An empty file part, sent by browsers when no file was chosen, is treated as
/// no image. Unknown fields are ignored.
pub(super) async fn read_post_form(
    multipart: &mut Multipart,
) -> Result<PostFormInput, PostFormPayloadError> {
    let mut input = PostFormInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(PostFormPayloadError::from_multipart)?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" | "slug" | "content" | "status" => {
                let value = field
                    .text()
                    .await
                    .map_err(PostFormPayloadError::from_multipart)?;
                match name.as_str() {
                    "title" => input.title = value,
                    "slug" => input.slug = value,
                    "content" => input.content = value,
                    _ => input.status = value,
                }
            }
            "image" => {
                let file_name = field
                    .file_name()
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default();
                let content_type = field.content_type().map(|mime| mime.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(PostFormPayloadError::from_multipart)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                debug!(
                    target = SOURCE,
                    file_name = %file_name,
                    size = bytes.len(),
                    "image part received"
                );
                input.image = Some(ImageUpload::new(file_name, content_type.as_deref(), bytes));
            }
            _ => continue,
        }
    }

    Ok(input)
}
