//! Diesel row structs mirroring [`crate::schema`], converted to and from the
//! domain entities at the repository boundary.

pub mod comment;
pub mod config;
pub mod post;
pub mod taxonomy;
pub mod user;
