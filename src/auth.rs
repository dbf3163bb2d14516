//! Session principal attached to requests after login.
//!
//! The serialized principal is stored in the identity cookie at login time,
//! so extracting it does not touch the database. Role checks still happen in
//! the service layer; this type only proves a session exists.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::domain::user::User;

/// The logged-in user as carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Raised when a route requires a session and none is present or readable.
/// Renders as a redirect to the login page rather than a bare 401.
#[derive(Debug, ThisError)]
#[error("authentication required")]
pub struct NotAuthenticated;

impl ResponseError for NotAuthenticated {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login"))
            .finish()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = Identity::from_request(req, payload)
            .into_inner()
            .map_err(|_| NotAuthenticated)
            .and_then(|identity| identity.id().map_err(|_| NotAuthenticated))
            .and_then(|id| serde_json::from_str::<AuthenticatedUser>(&id).map_err(|_| NotAuthenticated));

        ready(user.map_err(Error::from))
    }
}
