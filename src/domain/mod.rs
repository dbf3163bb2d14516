//! Framework-free domain entities shared by the repository and service layers.

pub mod comment;
pub mod post;
pub mod taxonomy;
pub mod user;
