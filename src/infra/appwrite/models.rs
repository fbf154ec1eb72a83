use serde::{Deserialize, Serialize};

use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::domain::posts::{FileRef, Post};
use crate::domain::types::PostStatus;

#[derive(Debug, Deserialize)]
pub(super) struct DocumentDto {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    status: PostStatus,
    #[serde(default, rename = "featuredImage")]
    featured_image: Option<String>,
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
}

impl From<DocumentDto> for Post {
    fn from(dto: DocumentDto) -> Self {
        Post {
            id: dto.id,
            title: dto.title,
            content: dto.content,
            status: dto.status,
            featured_image: dto.featured_image.unwrap_or_default(),
            user_id: dto.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FileDto {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    name: String,
}

impl From<FileDto> for FileRef {
    fn from(dto: FileDto) -> Self {
        FileRef {
            id: dto.id,
            name: dto.name,
        }
    }
}

/// Error envelope returned by every Appwrite endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub(super) message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateDocumentBody<'a> {
    pub(super) document_id: &'a str,
    pub(super) data: CreateDocumentData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateDocumentData<'a> {
    title: &'a str,
    content: &'a str,
    featured_image: &'a str,
    status: PostStatus,
    user_id: &'a str,
}

impl<'a> From<&'a CreatePostParams> for CreateDocumentBody<'a> {
    fn from(params: &'a CreatePostParams) -> Self {
        Self {
            document_id: &params.slug,
            data: CreateDocumentData {
                title: &params.title,
                content: &params.content,
                featured_image: &params.featured_image,
                status: params.status,
                user_id: &params.user_id,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateDocumentBody<'a> {
    pub(super) data: UpdateDocumentData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateDocumentData<'a> {
    title: &'a str,
    content: &'a str,
    status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_image: Option<&'a str>,
}

impl<'a> From<&'a UpdatePostParams> for UpdateDocumentBody<'a> {
    fn from(params: &'a UpdatePostParams) -> Self {
        Self {
            data: UpdateDocumentData {
                title: &params.title,
                content: &params.content,
                status: params.status,
                featured_image: params.featured_image.as_deref(),
            },
        }
    }
}
