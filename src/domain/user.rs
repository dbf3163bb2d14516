use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A registered account. There is no signup flow: the admin is created at
/// bootstrap and contributors via direct data administration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

/// Information required to insert a new [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}
