use async_trait::async_trait;
use reqwest::Method;

use super::{
    AppwriteClient,
    models::{CreateDocumentBody, DocumentDto, UpdateDocumentBody},
};
use crate::application::repos::{BackendError, CreatePostParams, PostsRepo, UpdatePostParams};
use crate::domain::posts::Post;

#[async_trait]
impl PostsRepo for AppwriteClient {
    async fn find_post(&self, id: &str) -> Result<Option<Post>, BackendError> {
        let url = self.documents_url(&[id])?;
        let resp = Self::send(self.request(Method::GET, url)).await?;
        let document: Option<DocumentDto> = Self::handle_optional(resp).await?;
        Ok(document.map(Post::from))
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<Option<Post>, BackendError> {
        let url = self.documents_url(&[])?;
        let body = CreateDocumentBody::from(&params);
        let resp = Self::send(self.request(Method::POST, url).json(&body)).await?;
        // A 404 here means the collection is missing, not the document.
        let document: Option<DocumentDto> = Self::handle(resp).await?;
        Ok(document.map(Post::from))
    }

    async fn update_post(
        &self,
        id: &str,
        params: UpdatePostParams,
    ) -> Result<Option<Post>, BackendError> {
        let url = self.documents_url(&[id])?;
        let body = UpdateDocumentBody::from(&params);
        let resp = Self::send(self.request(Method::PATCH, url).json(&body)).await?;
        let document: Option<DocumentDto> = Self::handle_optional(resp).await?;
        Ok(document.map(Post::from))
    }
}
