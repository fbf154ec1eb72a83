//! Submission of a post form to the backend.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};
use url::Url;

use super::form::{PostForm, ValidatedPost};
use crate::application::repos::{
    AuthStore, BackendError, CreatePostParams, FileStore, PostsRepo, UpdatePostParams,
};
use crate::domain::posts::{Post, post_path};

const SOURCE: &str = "application::post_form::submit";
pub const SUBMIT_METRIC: &str = "megablog_post_form_submit_total";

pub const MISSING_IMAGE: &str = "Please select an image file";
pub const MISSING_USER: &str = "User data not available. Please log in again.";
pub const CREATE_EMPTY: &str = "Failed to create post after file upload";
/// Shown when a backend error carries no message of its own.
pub const FALLBACK_ERROR: &str = "Error creating post";

/// What the editor should see after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Route to the given path.
    Navigate(String),
    /// A field rule failed; the form carries the field messages.
    Rejected,
    /// The form carries an error message.
    Failed,
    /// Nothing was saved and nothing went wrong.
    Stayed,
}

impl SubmitOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitOutcome::Navigate(_) => "navigate",
            SubmitOutcome::Rejected => "rejected",
            SubmitOutcome::Failed => "failed",
            SubmitOutcome::Stayed => "stayed",
        }
    }
}

#[derive(Clone)]
pub struct PostFormService {
    files: Arc<dyn FileStore>,
    posts: Arc<dyn PostsRepo>,
}

impl PostFormService {
    pub fn new(files: Arc<dyn FileStore>, posts: Arc<dyn PostsRepo>) -> Self {
        Self { files, posts }
    }

    pub async fn load_post(&self, id: &str) -> Result<Option<Post>, BackendError> {
        self.posts.find_post(id).await
    }

    pub fn featured_image_url(&self, post: &Post) -> Option<Url> {
        if post.featured_image.is_empty() {
            return None;
        }
        match self.files.file_preview_url(&post.featured_image) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!(
                    target = SOURCE,
                    post = %post.id,
                    error = %err,
                    "featured image preview unavailable"
                );
                None
            }
        }
    }

    /// Submit the form: validate, then create or update depending on its mode.
    ///
    /// The previous error is cleared first; at most one error is left on the
    /// form afterwards. Backend calls run strictly one after another.
    pub async fn submit(&self, form: &mut PostForm, auth: &dyn AuthStore) -> SubmitOutcome {
        form.begin_submission();
        let mode = form.mode().label();

        let outcome = match form.validated() {
            None => {
                if form.image_missing_for_create() {
                    form.set_error(MISSING_IMAGE);
                }
                SubmitOutcome::Rejected
            }
            Some(valid) => match form.post().cloned() {
                Some(post) => self.submit_edit(form, &post, valid).await,
                None => self.submit_create(form, valid, auth).await,
            },
        };

        counter!(SUBMIT_METRIC, "mode" => mode, "outcome" => outcome.label()).increment(1);
        info!(
            target = SOURCE,
            mode,
            outcome = outcome.label(),
            error = form.error().unwrap_or(""),
            "post form submitted"
        );
        outcome
    }

    async fn submit_edit(
        &self,
        form: &mut PostForm,
        post: &Post,
        valid: ValidatedPost,
    ) -> SubmitOutcome {
        let featured_image = match valid.image {
            Some(image) => match self.files.upload_file(image).await {
                Ok(file) => {
                    self.discard_previous_image(post).await;
                    Some(file.id)
                }
                Err(err) => return fail(form, &err, FALLBACK_ERROR),
            },
            None => None,
        };

        let params = UpdatePostParams {
            title: valid.title,
            content: sanitize_content(&valid.content),
            status: valid.status,
            featured_image,
        };

        match self.posts.update_post(&post.id, params).await {
            Ok(Some(updated)) => SubmitOutcome::Navigate(post_path(&updated.id)),
            Ok(None) => SubmitOutcome::Stayed,
            Err(err) => fail(form, &err, FALLBACK_ERROR),
        }
    }

    async fn submit_create(
        &self,
        form: &mut PostForm,
        valid: ValidatedPost,
        auth: &dyn AuthStore,
    ) -> SubmitOutcome {
        let Some(image) = valid.image else {
            form.set_error(MISSING_IMAGE);
            return SubmitOutcome::Failed;
        };

        let file = match self.files.upload_file(image).await {
            Ok(file) => file,
            Err(err) => {
                let detail = err.public_message().unwrap_or_else(|| FALLBACK_ERROR.into());
                form.set_error(format!("File upload failed: {detail}"));
                return SubmitOutcome::Failed;
            }
        };

        let Some(user) = auth.current_user() else {
            warn!(
                target = SOURCE,
                file = %file.id,
                "uploaded image left without a post: no authenticated user"
            );
            form.set_error(MISSING_USER);
            return SubmitOutcome::Failed;
        };

        let params = CreatePostParams {
            slug: valid.slug,
            title: valid.title,
            content: sanitize_content(&valid.content),
            status: valid.status,
            featured_image: file.id,
            user_id: user.id,
        };

        match self.posts.create_post(params).await {
            Ok(Some(post)) => SubmitOutcome::Navigate(post_path(&post.id)),
            Ok(None) => {
                form.set_error(CREATE_EMPTY);
                SubmitOutcome::Failed
            }
            Err(err) => fail(form, &err, FALLBACK_ERROR),
        }
    }

    /// Best-effort removal of the image being replaced; failures are only logged.
    async fn discard_previous_image(&self, post: &Post) {
        if post.featured_image.is_empty() {
            return;
        }
        if let Err(err) = self.files.delete_file(&post.featured_image).await {
            warn!(
                target = SOURCE,
                post = %post.id,
                file = %post.featured_image,
                error = %err,
                "failed to delete replaced featured image"
            );
        }
    }
}

fn fail(form: &mut PostForm, err: &BackendError, fallback: &str) -> SubmitOutcome {
    let message = err.public_message().unwrap_or_else(|| fallback.to_string());
    form.set_error(message);
    SubmitOutcome::Failed
}

fn sanitize_content(content: &str) -> String {
    ammonia::clean(content)
}
