use std::collections::BTreeMap;

use crate::domain::posts::{ImageUpload, Post};
use crate::domain::types::PostStatus;

/// Every input of the post form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Slug,
    Content,
    Status,
    Image,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Slug => "slug",
            Field::Content => "content",
            Field::Status => "status",
            Field::Image => "image",
        }
    }
}

/// Inputs whose value is plain text and can be written by watchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Slug,
    Content,
    Status,
}

impl From<TextField> for Field {
    fn from(field: TextField) -> Self {
        match field {
            TextField::Title => Field::Title,
            TextField::Slug => Field::Slug,
            TextField::Content => Field::Content,
            TextField::Status => Field::Status,
        }
    }
}

/// Raw form values, as the editor sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: String,
    pub image: Option<ImageUpload>,
}

impl FormValues {
    /// Defaults for a form editing `post`, or a blank active post.
    pub fn defaults_for(post: Option<&Post>) -> Self {
        match post {
            Some(post) => Self {
                title: post.title.clone(),
                slug: post.id.clone(),
                content: post.content.clone(),
                status: post.status.as_str().to_string(),
                image: None,
            },
            None => Self {
                title: String::new(),
                slug: String::new(),
                content: String::new(),
                status: PostStatus::Active.as_str().to_string(),
                image: None,
            },
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Title => &self.title,
            TextField::Slug => &self.slug,
            TextField::Content => &self.content,
            TextField::Status => &self.status,
        }
    }

    pub(super) fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Title => &mut self.title,
            TextField::Slug => &mut self.slug,
            TextField::Content => &mut self.content,
            TextField::Status => &mut self.status,
        }
    }
}

/// Validation rules that depend on the form mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub image_required: bool,
}

/// Per-field validation messages; at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    messages: BTreeMap<Field, &'static str>,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.messages.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.messages.iter().map(|(field, message)| (*field, *message))
    }

    pub(super) fn set(&mut self, field: Field, message: Option<&'static str>) {
        match message {
            Some(message) => {
                self.messages.insert(field, message);
            }
            None => {
                self.messages.remove(&field);
            }
        }
    }
}

pub(super) const TITLE_REQUIRED: &str = "Title is required";
pub(super) const SLUG_REQUIRED: &str = "Slug is required";
pub(super) const STATUS_INVALID: &str = "Status must be active or inactive";
pub(super) const IMAGE_REQUIRED: &str = "Featured image is required";
pub(super) const IMAGE_TYPE: &str = "Featured image must be a PNG, JPEG or GIF file";

/// Check a single field against the rules, returning its message when invalid.
pub(super) fn check_field(
    field: Field,
    values: &FormValues,
    rules: FieldRules,
) -> Option<&'static str> {
    match field {
        Field::Title => values.title.trim().is_empty().then_some(TITLE_REQUIRED),
        Field::Slug => values.slug.trim().is_empty().then_some(SLUG_REQUIRED),
        Field::Content => None,
        Field::Status => values
            .status
            .parse::<PostStatus>()
            .is_err()
            .then_some(STATUS_INVALID),
        Field::Image => match values.image.as_ref() {
            None if rules.image_required => Some(IMAGE_REQUIRED),
            None => None,
            Some(image) if !image.is_accepted_image() => Some(IMAGE_TYPE),
            Some(_) => None,
        },
    }
}
