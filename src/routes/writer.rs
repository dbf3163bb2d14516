use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::posts::{EditPostForm, PostFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::writer::{show_writer as show_writer_service, submit_post as submit_post_service};

#[get("/write")]
pub async fn write_page(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_writer_service(repo.get_ref()) {
        Ok((categories, tags)) => {
            let mut context = base_context(&flash_messages, Some(&user), "write");
            context.insert("categories", &categories);
            context.insert("tags", &tags);
            render_template(&tera, "writer/write.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render write page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/write")]
pub async fn submit_post(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<EditPostForm>,
) -> impl Responder {
    let payload: PostFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/write");
        }
    };

    match submit_post_service(payload, &user, repo.get_ref()) {
        Ok(_) => {
            if user.is_admin {
                FlashMessage::success("Post published.").send();
            } else {
                FlashMessage::success("Post submitted for review.").send();
            }
            redirect("/")
        }
        Err(e) => {
            log::error!("Failed to submit post: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
