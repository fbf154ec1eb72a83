use async_trait::async_trait;
use reqwest::{
    Method,
    multipart::{Form, Part},
};
use tracing::info;
use url::Url;

use super::{AppwriteClient, SOURCE, models::FileDto};
use crate::application::repos::{BackendError, FileStore};
use crate::domain::posts::{FileRef, ImageUpload};

/// Asks Appwrite to generate the file id.
const UNIQUE_ID: &str = "unique()";

#[async_trait]
impl FileStore for AppwriteClient {
    async fn upload_file(&self, file: ImageUpload) -> Result<FileRef, BackendError> {
        let ImageUpload {
            file_name,
            content_type,
            bytes,
        } = file;
        let size = bytes.len();
        let part = Part::bytes(bytes.to_vec())
            .file_name(file_name.clone())
            .mime_str(&content_type)
            .map_err(|err| BackendError::Configuration(format!("invalid content type: {err}")))?;
        let form = Form::new().text("fileId", UNIQUE_ID).part("file", part);

        let url = self.files_url(&[])?;
        let resp = Self::send(self.request(Method::POST, url).multipart(form)).await?;
        let file: FileDto = Self::handle(resp).await?;
        let file = FileRef::from(file);
        info!(
            target = SOURCE,
            file_id = %file.id,
            file_name = %file_name,
            size,
            "image uploaded"
        );
        Ok(file)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), BackendError> {
        let url = self.files_url(&[file_id])?;
        let resp = Self::send(self.request(Method::DELETE, url)).await?;
        Self::check(resp).await?;
        info!(target = SOURCE, file_id, "image deleted");
        Ok(())
    }

    fn file_preview_url(&self, file_id: &str) -> Result<Url, BackendError> {
        let mut url = self.files_url(&[file_id, "preview"])?;
        url.query_pairs_mut()
            .append_pair("project", &self.settings.project_id);
        Ok(url)
    }
}
