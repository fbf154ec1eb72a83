//! Post, file and user records exchanged with the backend.

use bytes::Bytes;
use serde::Serialize;

use super::types::PostStatus;

/// MIME types accepted for a featured image.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg", "image/gif"];

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A persisted blog post. The id is the slug chosen when the post was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub featured_image: String,
    pub user_id: Option<String>,
}

/// Public path of a post's detail view.
pub fn post_path(id: &str) -> String {
    format!("/post/{id}")
}

/// Reference to a file stored in the backend bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRef {
    pub id: String,
    pub name: String,
}

/// The authenticated user as reported by the auth store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
}

/// An image selected in the form, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Build an upload, guessing the content type from the file name when the
    /// client did not send a usable one.
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Bytes) -> Self {
        let file_name = file_name.into();
        let content_type = content_type
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != FALLBACK_CONTENT_TYPE)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_raw()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string()
            });

        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn is_accepted_image(&self) -> bool {
        ACCEPTED_IMAGE_TYPES.contains(&self.content_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_content_type_from_file_name() {
        let upload = ImageUpload::new("cover.png", None, Bytes::from_static(b"png"));
        assert_eq!(upload.content_type, "image/png");
        assert!(upload.is_accepted_image());

        let upload = ImageUpload::new(
            "cover.gif",
            Some("application/octet-stream"),
            Bytes::from_static(b"gif"),
        );
        assert_eq!(upload.content_type, "image/gif");
    }

    #[test]
    fn keeps_client_content_type() {
        let upload = ImageUpload::new("cover", Some("Image/JPEG"), Bytes::from_static(b"jpg"));
        assert_eq!(upload.content_type, "image/jpeg");
        assert!(upload.is_accepted_image());
    }

    #[test]
    fn rejects_non_image_types() {
        let upload = ImageUpload::new("notes.txt", None, Bytes::from_static(b"hi"));
        assert!(!upload.is_accepted_image());

        let upload = ImageUpload::new("vector.svg", None, Bytes::from_static(b"<svg/>"));
        assert!(!upload.is_accepted_image());
    }

    #[test]
    fn post_path_points_at_detail_view() {
        assert_eq!(post_path("hello-world"), "/post/hello-world");
    }
}
