pub use self::errors::{ServiceError, ServiceResult};

pub mod admin;
pub mod auth;
pub mod comments;
pub mod errors;
pub mod main;
pub mod uploads;
pub mod writer;
