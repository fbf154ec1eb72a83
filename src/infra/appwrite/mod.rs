//! REST adapter for the Appwrite project that stores posts and images.

mod documents;
mod models;
mod storage;

use metrics::counter;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::application::repos::BackendError;
use crate::config::AppwriteSettings;
use crate::infra::error::InfraError;

use models::ErrorBody;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SOURCE: &str = "infra::appwrite";

/// Counter of Appwrite calls that failed in transit or were rejected.
pub const FAILURE_METRIC: &str = "megablog_appwrite_failure_total";

/// Client for the Appwrite databases and storage APIs.
///
/// Implements both [`FileStore`](crate::application::repos::FileStore) and
/// [`PostsRepo`](crate::application::repos::PostsRepo).
#[derive(Clone, Debug)]
pub struct AppwriteClient {
    client: Client,
    settings: AppwriteSettings,
}

impl AppwriteClient {
    pub fn new(settings: &AppwriteSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(InfraError::HttpClient)?;
        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    fn user_agent() -> &'static str {
        concat!("megablog/", env!("CARGO_PKG_VERSION"))
    }

    /// Endpoint URL with `segments` appended, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.settings.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Configuration("endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn files_url(&self, extra: &[&str]) -> Result<Url, BackendError> {
        let mut segments = vec!["storage", "buckets", self.settings.bucket_id.as_str(), "files"];
        segments.extend_from_slice(extra);
        self.url(&segments)
    }

    fn documents_url(&self, extra: &[&str]) -> Result<Url, BackendError> {
        let mut segments = vec![
            "databases",
            self.settings.database_id.as_str(),
            "collections",
            self.settings.collection_id.as_str(),
            "documents",
        ];
        segments.extend_from_slice(extra);
        self.url(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(target = SOURCE, %method, %url, "appwrite request");
        self.client
            .request(method, url)
            .header(PROJECT_HEADER, &self.settings.project_id)
            .header(KEY_HEADER, &self.settings.api_key)
    }

    async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        request.send().await.map_err(|err| {
            counter!(FAILURE_METRIC, "status" => "transport").increment(1);
            BackendError::transport(err)
        })
    }

    /// Decode a JSON body, turning non-success statuses into `Rejected`.
    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
        let resp = Self::check(resp).await?;
        let text = resp.text().await.map_err(BackendError::transport)?;
        serde_json::from_str(&text).map_err(|err| BackendError::Decode(err.to_string()))
    }

    /// Like [`Self::handle`] but treats 404 and an empty body as `None`.
    async fn handle_optional<T: DeserializeOwned>(
        resp: Response,
    ) -> Result<Option<T>, BackendError> {
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        let text = resp.text().await.map_err(BackendError::transport)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map_err(|err| BackendError::Decode(err.to_string()))
    }

    async fn check(resp: Response) -> Result<Response, BackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        counter!(FAILURE_METRIC, "status" => status.as_u16().to_string()).increment(1);
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(BackendError::rejected(status.as_u16(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str) -> AppwriteSettings {
        AppwriteSettings {
            endpoint: Url::parse(endpoint).expect("valid endpoint"),
            project_id: "megablog".into(),
            api_key: "secret".into(),
            database_id: "blog".into(),
            collection_id: "articles".into(),
            bucket_id: "images".into(),
        }
    }

    #[test]
    fn urls_extend_the_endpoint_path() {
        let client = AppwriteClient::new(&settings("https://cloud.appwrite.io/v1/")).unwrap();
        assert_eq!(
            client.files_url(&["abc"]).unwrap().as_str(),
            "https://cloud.appwrite.io/v1/storage/buckets/images/files/abc"
        );
        assert_eq!(
            client.documents_url(&[]).unwrap().as_str(),
            "https://cloud.appwrite.io/v1/databases/blog/collections/articles/documents"
        );
    }

    #[test]
    fn url_segments_are_escaped() {
        let client = AppwriteClient::new(&settings("http://localhost/v1")).unwrap();
        assert_eq!(
            client.documents_url(&["a/b"]).unwrap().as_str(),
            "http://localhost/v1/databases/blog/collections/articles/documents/a%2Fb"
        );
    }
}
