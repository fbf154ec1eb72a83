mod editor;
mod errors;
mod forms;
mod handlers;
mod slug;

pub(super) use handlers::{admin_post_create, admin_post_edit, admin_post_new, admin_post_update};
pub(super) use slug::{admin_post_slug_from_title, admin_post_slug_manual};
