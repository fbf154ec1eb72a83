mod admin;
mod middleware;

pub use admin::{AdminState, HeaderIdentity, build_admin_router};
