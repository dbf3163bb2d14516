use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::auth::LoginForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::login as login_service;

#[get("/login")]
pub async fn login_page(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, user.as_ref(), "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let principal = match login_service(&form, repo.get_ref()) {
        Ok(principal) => principal,
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Invalid credentials").send();
            return redirect("/login");
        }
        Err(e) => {
            log::error!("Login failed: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let serialized = match serde_json::to_string(&principal) {
        Ok(serialized) => serialized,
        Err(e) => {
            log::error!("Failed to serialize session principal: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = Identity::login(&req.extensions(), serialized) {
        log::error!("Failed to establish session: {e}");
        return HttpResponse::InternalServerError().finish();
    }

    if principal.is_admin {
        redirect("/admin")
    } else {
        redirect("/write")
    }
}

// The `AuthenticatedUser` guard sends session-less callers to /login
// instead of the bare 401 the raw `Identity` extractor would produce.
#[get("/logout")]
pub async fn logout(_user: AuthenticatedUser, identity: Identity) -> impl Responder {
    identity.logout();
    redirect("/")
}
