use axum::http::{HeaderMap, HeaderName};

use crate::application::repos::AuthStore;
use crate::domain::posts::UserData;

/// The user id forwarded by the authenticating proxy, if any.
#[derive(Debug, Clone, Default)]
pub struct HeaderIdentity(Option<UserData>);

impl HeaderIdentity {
    pub fn from_headers(headers: &HeaderMap, name: &HeaderName) -> Self {
        let user = headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|id| UserData { id: id.to_string() });
        Self(user)
    }
}

impl AuthStore for HeaderIdentity {
    fn current_user(&self) -> Option<UserData> {
        self.0.clone()
    }
}
