use crate::db::{DbConnection, DbPool};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::taxonomy::{Category, Tag};
use crate::domain::user::{NewUser, User};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod comment;
pub mod errors;
pub mod post;
pub mod taxonomy;
#[cfg(test)]
pub mod test;
pub mod user;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing or searching posts. Results are always
/// ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    /// Restrict to publicly visible posts.
    pub published_only: bool,
    /// Filter by owning category.
    pub category_id: Option<i32>,
    /// Restrict to posts carrying a tag.
    pub tag_id: Option<i32>,
    /// Case-insensitive substring match over title or content.
    pub search: Option<String>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn published(mut self) -> Self {
        self.published_only = true;
        self
    }
    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn tag(mut self, tag_id: i32) -> Self {
        self.tag_id = Some(tag_id);
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for user accounts.
pub trait UserReader {
    /// Look up an account by its unique username.
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new account.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
}

/// Read-only operations for posts.
pub trait PostReader {
    /// List posts matching the supplied query parameters, with the total
    /// count before pagination.
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)>;
    /// Retrieve a post by its identifier.
    fn get_post_by_id(&self, id: i32) -> RepositoryResult<Option<Post>>;
    /// Total number of posts, published or not.
    fn count_posts(&self) -> RepositoryResult<usize>;
    /// The post with the highest view count; ties broken by storage order.
    fn most_viewed_post(&self) -> RepositoryResult<Option<Post>>;
}

/// Write operations for posts and their tag associations.
pub trait PostWriter {
    /// Persist a new post and its tag links atomically. Tag ids that do not
    /// resolve to an existing tag are dropped.
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;
    /// Replace a post's editable fields and its entire tag set atomically.
    fn update_post(&self, post_id: i32, update: &UpdatePost) -> RepositoryResult<usize>;
    /// Remove a post together with its comments and tag links.
    fn delete_post(&self, post_id: i32) -> RepositoryResult<usize>;
    /// Atomically bump the view counter by one.
    fn increment_views(&self, post_id: i32) -> RepositoryResult<usize>;
}

/// Read-only operations for comments.
pub trait CommentReader {
    /// Comments on a post, oldest first.
    fn list_comments(&self, post_id: i32) -> RepositoryResult<Vec<Comment>>;
    /// Retrieve a comment by its identifier.
    fn get_comment_by_id(&self, id: i32) -> RepositoryResult<Option<Comment>>;
    /// Total number of comments across all posts.
    fn count_comments(&self) -> RepositoryResult<usize>;
}

/// Write operations for comments.
pub trait CommentWriter {
    /// Persist a new comment.
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;
    /// Delete a comment by id.
    fn delete_comment(&self, id: i32) -> RepositoryResult<usize>;
}

/// Read-only operations for categories and tags.
pub trait TaxonomyReader {
    /// All categories, ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// All tags, ordered by name.
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    /// Look up a category by its unique name.
    fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<Category>>;
    /// Look up a tag by its unique name.
    fn get_tag_by_name(&self, name: &str) -> RepositoryResult<Option<Tag>>;
}
