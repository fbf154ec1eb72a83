mod health;
mod identity;
mod posts;
mod state;

pub use identity::HeaderIdentity;
pub use state::AdminState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use super::middleware::{log_responses, set_request_context};

pub fn build_admin_router(state: AdminState, upload_body_limit: usize) -> Router {
    let user_header = state.user_header.clone();
    Router::new()
        .route(
            "/posts/new",
            get(posts::admin_post_new)
                .post(posts::admin_post_create)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route(
            "/posts/{id}/edit",
            get(posts::admin_post_edit)
                .post(posts::admin_post_update)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/posts/slug/title", post(posts::admin_post_slug_from_title))
        .route("/posts/slug/manual", post(posts::admin_post_slug_manual))
        .route("/health", get(health::admin_health))
        .with_state(state)
        .layer(middleware::from_fn_with_state(user_header, log_responses))
        .layer(middleware::from_fn(set_request_context))
}
