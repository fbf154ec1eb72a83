use tracing::debug;

use super::fields::{Field, FieldErrors, FieldRules, FormValues, TextField};
use super::state::{FieldUpdate, FormState, WatchSubscription};
use crate::domain::posts::{ImageUpload, Post};
use crate::domain::slug::derive_slug;
use crate::domain::types::PostStatus;

const SOURCE: &str = "application::post_form";

/// Whether the form creates a post or edits the one it was mounted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Post),
}

impl FormMode {
    pub fn label(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit(_) => "edit",
        }
    }
}

/// Raw values submitted by the browser, replayed onto a mounted form.
#[derive(Debug, Clone, Default)]
pub struct PostFormInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: String,
    pub image: Option<ImageUpload>,
}

/// Values that passed validation, ready for the backend.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedPost {
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) content: String,
    pub(crate) status: PostStatus,
    pub(crate) image: Option<ImageUpload>,
}

/// Editable state of one post form, from mount to teardown.
///
/// Mounting installs the title watcher that keeps the slug derived from the
/// title; the watcher is released when the form is dropped.
pub struct PostForm {
    mode: FormMode,
    state: FormState,
    error: String,
    _title_watch: WatchSubscription,
}

impl PostForm {
    pub fn mount(post: Option<Post>) -> Self {
        let values = FormValues::defaults_for(post.as_ref());
        let rules = FieldRules {
            image_required: post.is_none(),
        };
        let state = FormState::new(values, rules);
        let title_watch = state.watch(|event| {
            if event.field == Field::Title {
                vec![FieldUpdate::validated(
                    TextField::Slug,
                    derive_slug(&event.values.title),
                )]
            } else {
                Vec::new()
            }
        });

        let mode = match post {
            Some(post) => FormMode::Edit(post),
            None => FormMode::Create,
        };
        debug!(target = SOURCE, mode = mode.label(), "post form mounted");

        Self {
            mode,
            state,
            error: String::new(),
            _title_watch: title_watch,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn post(&self) -> Option<&Post> {
        match &self.mode {
            FormMode::Edit(post) => Some(post),
            FormMode::Create => None,
        }
    }

    pub fn values(&self) -> &FormValues {
        self.state.values()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        self.state.errors()
    }

    /// The error shown above the form, if any.
    pub fn error(&self) -> Option<&str> {
        (!self.error.is_empty()).then_some(self.error.as_str())
    }

    pub fn watcher_count(&self) -> usize {
        self.state.watcher_count()
    }

    pub fn input_title(&mut self, title: impl Into<String>) {
        self.state.set_value(TextField::Title, title, true);
    }

    /// Manual slug edit; the input is normalised before it is stored.
    pub fn input_slug(&mut self, raw: &str) {
        self.state.set_value(TextField::Slug, derive_slug(raw), true);
    }

    pub fn input_content(&mut self, content: impl Into<String>) {
        self.state.set_value(TextField::Content, content, false);
    }

    pub fn select_status(&mut self, status: impl Into<String>) {
        self.state.set_value(TextField::Status, status, true);
    }

    pub fn attach_image(&mut self, image: Option<ImageUpload>) {
        self.state.set_image(image, true);
    }

    /// Replay browser-submitted values in the order the editor typed them.
    ///
    /// A changed title goes through the title watcher first. The submitted
    /// slug is the last value the editor saw, so it is applied as a manual
    /// edit whenever it differs from the one the watcher just derived.
    pub fn apply_input(&mut self, input: PostFormInput) {
        let PostFormInput {
            title,
            slug,
            content,
            status,
            image,
        } = input;

        if title != self.values().title {
            self.input_title(title);
        }
        if slug != self.values().slug {
            self.input_slug(&slug);
        }
        if content != self.values().content {
            self.input_content(content);
        }
        if status != self.values().status {
            self.select_status(status);
        }
        if image.is_some() {
            self.attach_image(image);
        }
    }

    pub(crate) fn begin_submission(&mut self) {
        self.error.clear();
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = message.into();
    }

    pub(crate) fn image_missing_for_create(&self) -> bool {
        self.state.rules().image_required && self.values().image.is_none()
    }

    /// Run every field rule; `None` when any field is invalid.
    pub(crate) fn validated(&mut self) -> Option<ValidatedPost> {
        if !self.state.validate_all() {
            return None;
        }

        let values = self.state.values();
        let status = values.status.parse::<PostStatus>().ok()?;
        Some(ValidatedPost {
            title: values.title.trim().to_string(),
            slug: values.slug.clone(),
            content: values.content.clone(),
            status,
            image: values.image.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::super::fields::SLUG_REQUIRED;
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: "hello-world".into(),
            title: "Hello World".into(),
            content: "<p>Hi</p>".into(),
            status: PostStatus::Active,
            featured_image: "file-1".into(),
            user_id: Some("user-1".into()),
        }
    }

    #[test]
    fn title_edits_always_rederive_the_slug() {
        let mut form = PostForm::mount(None);
        for title in ["My First Post!", "  Second   take ", "", "Rust & You"] {
            form.input_title(title);
            assert_eq!(form.values().slug, derive_slug(title));
        }
    }

    #[test]
    fn title_edit_overrides_manual_slug() {
        let mut form = PostForm::mount(None);
        form.input_slug("Custom Slug");
        assert_eq!(form.values().slug, "custom-slug");

        form.input_title("Another Title");
        assert_eq!(form.values().slug, "another-title");
    }

    #[test]
    fn manual_slug_is_normalised() {
        let mut form = PostForm::mount(Some(sample_post()));
        form.input_slug("  Hello   THERE!! ");
        assert_eq!(form.values().slug, "hello-there-");
        assert!(form.field_errors().get(Field::Slug).is_none());
    }

    #[test]
    fn mounting_installs_a_single_title_watch() {
        let form = PostForm::mount(None);
        assert_eq!(form.watcher_count(), 1);
    }

    #[test]
    fn apply_input_follows_title_when_slug_matches_derivation() {
        let mut form = PostForm::mount(Some(sample_post()));
        form.apply_input(PostFormInput {
            title: "Hello Again".into(),
            slug: "hello-again".into(),
            content: "<p>Hi</p>".into(),
            status: "active".into(),
            image: None,
        });
        assert_eq!(form.values().slug, "hello-again");
        assert!(form.field_errors().get(Field::Slug).is_none());
    }

    #[test]
    fn apply_input_with_cleared_slug_fails_validation() {
        let mut form = PostForm::mount(None);
        form.apply_input(PostFormInput {
            title: "My Post".into(),
            slug: String::new(),
            content: String::new(),
            status: "active".into(),
            image: Some(ImageUpload::new(
                "cover.png",
                None,
                Bytes::from_static(b"png"),
            )),
        });

        assert_eq!(form.values().slug, "");
        assert!(form.validated().is_none());
        assert_eq!(form.field_errors().get(Field::Slug), Some(SLUG_REQUIRED));
    }

    #[test]
    fn apply_input_keeps_manual_slug_typed_after_title() {
        let mut form = PostForm::mount(None);
        form.apply_input(PostFormInput {
            title: "Hello Again".into(),
            slug: "My Own Slug".into(),
            content: String::new(),
            status: "inactive".into(),
            image: None,
        });
        assert_eq!(form.values().title, "Hello Again");
        assert_eq!(form.values().slug, "my-own-slug");
        assert_eq!(form.values().status, "inactive");
    }

    #[test]
    fn validated_requires_image_only_when_creating() {
        let mut create = PostForm::mount(None);
        create.input_title("Title");
        assert!(create.validated().is_none());
        assert!(create.image_missing_for_create());

        create.attach_image(Some(ImageUpload::new(
            "cover.png",
            None,
            Bytes::from_static(b"png"),
        )));
        let valid = create.validated().expect("form should validate");
        assert_eq!(valid.slug, "title");
        assert_eq!(valid.status, PostStatus::Active);

        let mut edit = PostForm::mount(Some(sample_post()));
        assert!(edit.validated().is_some());
        assert!(!edit.image_missing_for_create());
    }

    #[test]
    fn error_is_empty_until_set() {
        let mut form = PostForm::mount(None);
        assert_eq!(form.error(), None);
        form.set_error("boom");
        assert_eq!(form.error(), Some("boom"));
        form.begin_submission();
        assert_eq!(form.error(), None);
    }
}
