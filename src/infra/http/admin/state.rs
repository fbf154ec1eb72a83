use std::sync::Arc;

use axum::http::HeaderName;
use url::Url;

use crate::application::post_form::PostFormService;

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<PostFormService>,
    /// Header carrying the id of the user authenticated upstream.
    pub user_header: HeaderName,
    /// Base for redirects after a successful save; relative paths when unset.
    pub public_url: Option<Url>,
}
