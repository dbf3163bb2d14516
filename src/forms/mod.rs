//! HTML form definitions and their validated payload conversions.

pub mod auth;
pub mod comments;
pub mod posts;
