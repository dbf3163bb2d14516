//! Business logic for the public pages: listing, detail, taxonomy browsing
//! and search.

use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::taxonomy::{Category, Tag};
use crate::pagination::{DEFAULT_PER_PAGE, Paginated};
use crate::repository::{CommentReader, PostListQuery, PostReader, PostWriter, TaxonomyReader};

use super::{ServiceError, ServiceResult};

/// Everything the post detail page renders.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Published posts, newest first, five per page.
pub fn show_index<R>(page: usize, repo: &R) -> ServiceResult<Paginated<Post>>
where
    R: PostReader,
{
    let query = PostListQuery::default()
        .published()
        .paginate(page, DEFAULT_PER_PAGE);

    match repo.list_posts(query) {
        Ok((total, posts)) => Ok(Paginated::new(posts, page, DEFAULT_PER_PAGE, total)),
        Err(e) => {
            log::error!("Failed to list posts: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Case-insensitive substring search over title and content, published
/// posts only. An empty query matches everything.
pub fn search_posts<R>(query: &str, page: usize, repo: &R) -> ServiceResult<Paginated<Post>>
where
    R: PostReader,
{
    let list_query = PostListQuery::default()
        .published()
        .search(query)
        .paginate(page, DEFAULT_PER_PAGE);

    match repo.list_posts(list_query) {
        Ok((total, posts)) => Ok(Paginated::new(posts, page, DEFAULT_PER_PAGE, total)),
        Err(e) => {
            log::error!("Failed to search posts: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a post for its detail page, bumping the view counter.
///
/// Unpublished posts are hidden from anonymous visitors (`Unauthorized`,
/// rendered as a redirect to the listing) but visible to any logged-in
/// identity, admin or not.
pub fn show_post<R>(
    post_id: i32,
    viewer: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<PostDetail>
where
    R: PostReader + PostWriter + CommentReader,
{
    let mut post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load post {post_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !post.is_published && viewer.is_none() {
        return Err(ServiceError::Unauthorized);
    }

    // Counted per render, no per-visitor dedup.
    if let Err(e) = repo.increment_views(post_id) {
        log::error!("Failed to increment views for post {post_id}: {e}");
        return Err(ServiceError::Internal);
    }
    post.views += 1;

    let comments = match repo.list_comments(post_id) {
        Ok(comments) => comments,
        Err(e) => {
            log::error!("Failed to load comments for post {post_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(PostDetail { post, comments })
}

/// Published posts in a category, newest first.
pub fn show_category<R>(name: &str, repo: &R) -> ServiceResult<(Category, Vec<Post>)>
where
    R: TaxonomyReader + PostReader,
{
    let category = match repo.get_category_by_name(name) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to look up category {name}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let query = PostListQuery::default().published().category(category.id);
    match repo.list_posts(query) {
        Ok((_total, posts)) => Ok((category, posts)),
        Err(e) => {
            log::error!("Failed to list posts for category {name}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Posts carrying a tag. The tag's full post set is loaded and then
/// narrowed to published posts in memory.
pub fn show_tag<R>(name: &str, repo: &R) -> ServiceResult<(Tag, Vec<Post>)>
where
    R: TaxonomyReader + PostReader,
{
    let tag = match repo.get_tag_by_name(name) {
        Ok(Some(tag)) => tag,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to look up tag {name}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.list_posts(PostListQuery::default().tag(tag.id)) {
        Ok((_total, posts)) => {
            let posts = posts.into_iter().filter(|p| p.is_published).collect();
            Ok((tag, posts))
        }
        Err(e) => {
            log::error!("Failed to list posts for tag {name}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
