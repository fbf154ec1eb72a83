//! Collaborator traits describing the backend, storage and auth adapters.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::domain::posts::{FileRef, ImageUpload, Post, UserData};
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("invalid backend response: {0}")]
    Decode(String),
    #[error("invalid backend configuration: {0}")]
    Configuration(String),
}

impl BackendError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// The message to surface to the editor, if the error carries one.
    pub fn public_message(&self) -> Option<String> {
        let message = self.to_string();
        let trimmed = message.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub featured_image: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePostParams {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload_file(&self, file: ImageUpload) -> Result<FileRef, BackendError>;

    async fn delete_file(&self, file_id: &str) -> Result<(), BackendError>;

    fn file_preview_url(&self, file_id: &str) -> Result<Url, BackendError>;
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_post(&self, id: &str) -> Result<Option<Post>, BackendError>;

    /// Create a post whose id is `params.slug`. `None` means the backend
    /// accepted the call but produced no document.
    async fn create_post(&self, params: CreatePostParams) -> Result<Option<Post>, BackendError>;

    /// Update a post in place. `None` means there was nothing to update.
    async fn update_post(
        &self,
        id: &str,
        params: UpdatePostParams,
    ) -> Result<Option<Post>, BackendError>;
}

/// Read-only view of the authenticated user, injected per request.
pub trait AuthStore: Send + Sync {
    fn current_user(&self) -> Option<UserData>;
}

impl AuthStore for Option<UserData> {
    fn current_user(&self) -> Option<UserData> {
        self.clone()
    }
}
