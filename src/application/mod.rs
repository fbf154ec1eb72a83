//! Application services layer.

pub mod error;
pub mod post_form;
pub mod repos;
