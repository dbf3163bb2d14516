//! Admin-only operations: post CRUD, comment moderation and the dashboard.

use std::path::Path;

use actix_multipart::form::tempfile::TempFile;
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::taxonomy::{Category, Tag};
use crate::forms::posts::PostFormPayload;
use crate::pagination::Pagination;
use crate::repository::{
    CommentReader, CommentWriter, PostListQuery, PostReader, PostWriter, TaxonomyReader,
};
use crate::services::uploads::save_post_image;

use super::{ServiceError, ServiceResult};

/// Number of posts shown in the dashboard's recent list.
const RECENT_POSTS: usize = 5;

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Data for the admin page: every post regardless of publish state, plus
/// the taxonomy for the create form.
#[derive(Debug, Clone, Serialize)]
pub struct AdminContext {
    pub posts: Vec<Post>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

pub fn show_admin<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<AdminContext>
where
    R: PostReader + TaxonomyReader,
{
    ensure_admin(user)?;

    let (_, posts) = repo.list_posts(PostListQuery::default()).map_err(|e| {
        log::error!("Failed to list posts: {e}");
        ServiceError::Internal
    })?;
    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;
    let tags = repo.list_tags().map_err(|e| {
        log::error!("Failed to list tags: {e}");
        ServiceError::Internal
    })?;

    Ok(AdminContext {
        posts,
        categories,
        tags,
    })
}

/// Create a post through the admin form. Unlike contributor submission the
/// publish flag is taken as submitted.
///
/// The role check runs before the upload is stored, so a rejected caller
/// leaves nothing behind in the upload directory.
pub fn create_post<R>(
    payload: PostFormPayload,
    image: Option<TempFile>,
    upload_dir: &Path,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Post>
where
    R: PostWriter,
{
    ensure_admin(user)?;

    let image = save_post_image(image, upload_dir).map_err(|e| {
        log::error!("Failed to store uploaded image: {e}");
        ServiceError::Internal
    })?;

    let new_post = NewPost {
        title: payload.title,
        content: payload.content,
        image,
        is_published: payload.is_published,
        category_id: payload.category_id,
        tag_ids: payload.tag_ids,
    };

    repo.create_post(&new_post).map_err(|e| {
        log::error!("Failed to create post: {e}");
        ServiceError::Internal
    })
}

/// Data for the edit form.
pub fn show_edit_post<R>(
    post_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<(Post, Vec<Category>, Vec<Tag>)>
where
    R: PostReader + TaxonomyReader,
{
    ensure_admin(user)?;

    let post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load post {post_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;
    let tags = repo.list_tags().map_err(|e| {
        log::error!("Failed to list tags: {e}");
        ServiceError::Internal
    })?;

    Ok((post, categories, tags))
}

/// Replace a post's fields and its whole tag set.
pub fn update_post<R>(
    post_id: i32,
    payload: PostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PostWriter,
{
    ensure_admin(user)?;

    let update = UpdatePost {
        title: payload.title,
        content: payload.content,
        is_published: payload.is_published,
        category_id: payload.category_id,
        tag_ids: payload.tag_ids,
    };

    match repo.update_post(post_id, &update) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update post {post_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a post together with its comments and tag links.
pub fn delete_post<R>(post_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: PostWriter,
{
    ensure_admin(user)?;

    match repo.delete_post(post_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete post {post_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a comment, returning the owning post id for the redirect.
pub fn delete_comment<R>(
    comment_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<i32>
where
    R: CommentReader + CommentWriter,
{
    ensure_admin(user)?;

    let comment = match repo.get_comment_by_id(comment_id) {
        Ok(Some(comment)) => comment,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load comment {comment_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.delete_comment(comment_id) {
        Ok(_) => Ok(comment.post_id),
        Err(e) => {
            log::error!("Failed to delete comment {comment_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Read-only aggregate numbers for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_posts: usize,
    pub total_comments: usize,
    pub most_viewed_post: Option<Post>,
    pub recent_posts: Vec<Post>,
}

pub fn show_dashboard<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<DashboardStats>
where
    R: PostReader + CommentReader,
{
    ensure_admin(user)?;

    let total_posts = repo.count_posts().map_err(|e| {
        log::error!("Failed to count posts: {e}");
        ServiceError::Internal
    })?;
    let total_comments = repo.count_comments().map_err(|e| {
        log::error!("Failed to count comments: {e}");
        ServiceError::Internal
    })?;
    let most_viewed_post = repo.most_viewed_post().map_err(|e| {
        log::error!("Failed to find most viewed post: {e}");
        ServiceError::Internal
    })?;
    let recent = PostListQuery {
        pagination: Some(Pagination {
            page: 1,
            per_page: RECENT_POSTS,
        }),
        ..PostListQuery::default()
    };
    let (_, recent_posts) = repo.list_posts(recent).map_err(|e| {
        log::error!("Failed to list recent posts: {e}");
        ServiceError::Internal
    })?;

    Ok(DashboardStats {
        total_posts,
        total_comments,
        most_viewed_post,
        recent_posts,
    })
}
