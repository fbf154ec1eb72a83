//! MegaBlog post editor: slug derivation, the post form and its Appwrite backend.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub(crate) mod util;
