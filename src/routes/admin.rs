use std::path::Path;

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::posts::{EditPostForm, PostForm, PostFormPayload};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::admin::{
    create_post as create_post_service, delete_comment as delete_comment_service,
    delete_post as delete_post_service, show_admin as show_admin_service,
    show_dashboard as show_dashboard_service, show_edit_post as show_edit_post_service,
    update_post as update_post_service,
};

#[get("/admin")]
pub async fn admin_page(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_admin_service(&user, repo.get_ref()) {
        Ok(admin) => {
            let mut context = base_context(&flash_messages, Some(&user), "admin");
            context.insert("posts", &admin.posts);
            context.insert("categories", &admin.categories);
            context.insert("tags", &admin.tags);
            render_template(&tera, "admin/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/login"),
        Err(e) => {
            log::error!("Failed to render admin page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin")]
pub async fn create_post(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> impl Responder {
    let (payload, image) = match form.into_payload() {
        Ok(parts) => parts,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin");
        }
    };

    let upload_dir = Path::new(&server_config.upload_dir);
    match create_post_service(payload, image, upload_dir, &user, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Post created.").send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => redirect("/login"),
        Err(e) => {
            log::error!("Failed to create post: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/edit/{post_id}")]
pub async fn edit_post_page(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_edit_post_service(post_id.into_inner(), &user, repo.get_ref()) {
        Ok((post, categories, tags)) => {
            let mut context = base_context(&flash_messages, Some(&user), "admin");
            context.insert("post", &post);
            context.insert("categories", &categories);
            context.insert("tags", &tags);
            render_template(&tera, "admin/edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render edit page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/edit/{post_id}")]
pub async fn edit_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<EditPostForm>,
) -> impl Responder {
    let post_id = post_id.into_inner();

    let payload: PostFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&format!("/admin/edit/{post_id}"));
        }
    };

    match update_post_service(post_id, payload, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Post updated.").send();
            redirect(&format!("/post/{post_id}"))
        }
        Err(ServiceError::Unauthorized) => redirect("/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to update post {post_id}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/delete/{post_id}")]
pub async fn delete_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let post_id = post_id.into_inner();

    match delete_post_service(post_id, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Post deleted.").send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => redirect("/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to delete post {post_id}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/comment/delete/{comment_id}")]
pub async fn delete_comment(
    comment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let comment_id = comment_id.into_inner();

    match delete_comment_service(comment_id, &user, repo.get_ref()) {
        Ok(post_id) => redirect(&format!("/post/{post_id}")),
        Err(ServiceError::Unauthorized) => redirect("/login"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to delete comment {comment_id}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/dashboard")]
pub async fn dashboard(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_dashboard_service(&user, repo.get_ref()) {
        Ok(stats) => {
            let mut context = base_context(&flash_messages, Some(&user), "dashboard");
            context.insert("total_posts", &stats.total_posts);
            context.insert("total_comments", &stats.total_comments);
            context.insert("most_viewed_post", &stats.most_viewed_post);
            context.insert("recent_posts", &stats.recent_posts);
            render_template(&tera, "admin/dashboard.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/login"),
        Err(e) => {
            log::error!("Failed to render dashboard: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
