use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::main::{
    search_posts as search_posts_service, show_category as show_category_service,
    show_index as show_index_service, show_post as show_post_service,
    show_tag as show_tag_service,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<usize>,
}

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    let page = query.page.unwrap_or(1);

    match show_index_service(page, repo.get_ref()) {
        Ok(posts) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("posts", &posts.items);
            context.insert("pagination", &posts);
            render_template(&tera, "main/index.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render index: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/post/{post_id}")]
pub async fn post_detail(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_post_service(post_id.into_inner(), user.as_ref(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "post");
            context.insert("meta_title", detail.post.seo_title());
            context.insert("meta_description", &detail.post.seo_description());
            context.insert("reading_time", &detail.post.reading_time());
            context.insert("post", &detail.post);
            context.insert("comments", &detail.comments);
            render_template(&tera, "main/post.html", &context)
        }
        // Unpublished posts are hidden from anonymous visitors.
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render post: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{name}")]
pub async fn category_view(
    name: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_category_service(&name, repo.get_ref()) {
        Ok((category, posts)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "category");
            context.insert("category", &category);
            context.insert("posts", &posts);
            render_template(&tera, "main/category.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render category: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/tag/{name}")]
pub async fn tag_view(
    name: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_tag_service(&name, repo.get_ref()) {
        Ok((tag, posts)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "tag");
            context.insert("tag", &tag);
            context.insert("posts", &posts);
            render_template(&tera, "main/tag.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to render tag: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/search")]
pub async fn search(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    let page = query.page.unwrap_or(1);

    match search_posts_service(&query.q, page, repo.get_ref()) {
        Ok(posts) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "search");
            context.insert("posts", &posts.items);
            context.insert("pagination", &posts);
            context.insert("search_query", &query.q);
            render_template(&tera, "main/index.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render search results: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
