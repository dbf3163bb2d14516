use actix_web::{HttpResponse, Responder, post, web};

use crate::forms::comments::CommentForm;
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::ServiceError;
use crate::services::comments::add_comment as add_comment_service;

#[post("/post/{post_id}/comment")]
pub async fn add_comment(
    post_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CommentForm>,
) -> impl Responder {
    let post_id = post_id.into_inner();

    match add_comment_service(post_id, &form, repo.get_ref()) {
        Ok(()) => redirect(&format!("/post/{post_id}")),
        // Commenting on an unpublished post bounces to the listing.
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to add comment to post {post_id}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
