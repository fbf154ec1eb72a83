#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, http::HeaderName};
use megablog::{
    application::{
        post_form::PostFormService,
        repos::{BackendError, CreatePostParams, FileStore, PostsRepo, UpdatePostParams},
    },
    domain::{
        posts::{FileRef, ImageUpload, Post},
        types::PostStatus,
    },
    infra::http::{AdminState, build_admin_router},
};
use url::Url;

pub const USER_HEADER: &str = "x-user-id";
pub const BOUNDARY: &str = "megablog-test-boundary";

/// Backend double holding posts and files in memory.
#[derive(Default)]
pub struct InMemoryBackend {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    posts: BTreeMap<String, Post>,
    files: BTreeMap<String, ImageUpload>,
    next_file: usize,
    deleted: Vec<String>,
    fail_uploads: Option<String>,
}

impl InMemoryBackend {
    pub fn with_post(post: Post) -> Self {
        let backend = Self::default();
        backend.lock().posts.insert(post.id.clone(), post);
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("backend lock")
    }

    pub fn post(&self, id: &str) -> Option<Post> {
        self.lock().posts.get(id).cloned()
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn file_ids(&self) -> Vec<String> {
        self.lock().files.keys().cloned().collect()
    }

    pub fn deleted_files(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    pub fn fail_uploads_with(&self, message: &str) {
        self.lock().fail_uploads = Some(message.to_string());
    }
}

#[async_trait]
impl FileStore for InMemoryBackend {
    async fn upload_file(&self, file: ImageUpload) -> Result<FileRef, BackendError> {
        let mut inner = self.lock();
        if let Some(message) = inner.fail_uploads.clone() {
            return Err(BackendError::rejected(400, message));
        }
        inner.next_file += 1;
        let id = format!("file-{}", inner.next_file);
        let name = file.file_name.clone();
        inner.files.insert(id.clone(), file);
        Ok(FileRef { id, name })
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), BackendError> {
        let mut inner = self.lock();
        inner.files.remove(file_id);
        inner.deleted.push(file_id.to_string());
        Ok(())
    }

    fn file_preview_url(&self, file_id: &str) -> Result<Url, BackendError> {
        Url::parse(&format!("https://files.test/{file_id}/preview"))
            .map_err(|err| BackendError::Configuration(err.to_string()))
    }
}

#[async_trait]
impl PostsRepo for InMemoryBackend {
    async fn find_post(&self, id: &str) -> Result<Option<Post>, BackendError> {
        Ok(self.post(id))
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<Option<Post>, BackendError> {
        let mut inner = self.lock();
        if inner.posts.contains_key(&params.slug) {
            return Err(BackendError::rejected(
                409,
                "Document with the requested ID already exists.",
            ));
        }
        let post = Post {
            id: params.slug.clone(),
            title: params.title,
            content: params.content,
            status: params.status,
            featured_image: params.featured_image,
            user_id: Some(params.user_id),
        };
        inner.posts.insert(post.id.clone(), post.clone());
        Ok(Some(post))
    }

    async fn update_post(
        &self,
        id: &str,
        params: UpdatePostParams,
    ) -> Result<Option<Post>, BackendError> {
        let mut inner = self.lock();
        let Some(post) = inner.posts.get_mut(id) else {
            return Ok(None);
        };
        post.title = params.title;
        post.content = params.content;
        post.status = params.status;
        if let Some(image) = params.featured_image {
            post.featured_image = image;
        }
        Ok(Some(post.clone()))
    }
}

pub fn existing_post() -> Post {
    Post {
        id: "hello-world".into(),
        title: "Hello World".into(),
        content: "<p>Hi there</p>".into(),
        status: PostStatus::Active,
        featured_image: "file-old".into(),
        user_id: Some("user-1".into()),
    }
}

pub fn router(backend: Arc<InMemoryBackend>) -> Router {
    let service = PostFormService::new(backend.clone(), backend);
    let state = AdminState {
        posts: Arc::new(service),
        user_header: HeaderName::from_static(USER_HEADER),
        public_url: None,
    };
    build_admin_router(state, 1024 * 1024)
}

/// Multipart body builder for editor submissions.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }
}
