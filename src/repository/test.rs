use std::cell::RefCell;

use chrono::Utc;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::taxonomy::{Category, Tag};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CommentReader, CommentWriter, PostListQuery, PostReader, PostWriter, TaxonomyReader,
    UserReader, UserWriter,
};

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    users: RefCell<Vec<User>>,
    posts: RefCell<Vec<Post>>,
    comments: RefCell<Vec<Comment>>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.users.borrow_mut() = users;
        self
    }

    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        *self.posts.borrow_mut() = posts;
        self
    }

    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        *self.comments.borrow_mut() = comments;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    fn resolve_tags(&self, tag_ids: &[i32]) -> Vec<Tag> {
        self.tags
            .iter()
            .filter(|t| tag_ids.contains(&t.id))
            .cloned()
            .collect()
    }

    fn next_post_id(&self) -> i32 {
        self.posts.borrow().iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    fn next_comment_id(&self) -> i32 {
        self.comments.borrow().iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

impl UserReader for TestRepository {
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut users = self.users.borrow_mut();
        let created = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            is_admin: user.is_admin,
            created_at: Utc::now().naive_utc(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

impl PostReader for TestRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        let mut items: Vec<Post> = self.posts.borrow().clone();

        if query.published_only {
            items.retain(|p| p.is_published);
        }
        if let Some(category_id) = query.category_id {
            items.retain(|p| p.category_id == Some(category_id));
        }
        if let Some(tag_id) = query.tag_id {
            items.retain(|p| p.tags.iter().any(|t| t.id == tag_id));
        }
        if let Some(search) = &query.search {
            let search = search.to_lowercase();
            items.retain(|p| {
                p.title.to_lowercase().contains(&search)
                    || p.content.to_lowercase().contains(&search)
            });
        }

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len();

        if let Some(pagination) = &query.pagination {
            let start = (pagination.page.max(1) - 1) * pagination.per_page;
            items = items
                .into_iter()
                .skip(start)
                .take(pagination.per_page)
                .collect();
        }

        Ok((total, items))
    }

    fn get_post_by_id(&self, id: i32) -> RepositoryResult<Option<Post>> {
        Ok(self.posts.borrow().iter().find(|p| p.id == id).cloned())
    }

    fn count_posts(&self) -> RepositoryResult<usize> {
        Ok(self.posts.borrow().len())
    }

    fn most_viewed_post(&self) -> RepositoryResult<Option<Post>> {
        Ok(self
            .posts
            .borrow()
            .iter()
            .max_by_key(|p| p.views)
            .cloned())
    }
}

impl PostWriter for TestRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        let created = Post {
            id: self.next_post_id(),
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: Utc::now().naive_utc(),
            views: 0,
            image: post.image.clone(),
            is_published: post.is_published,
            meta_title: None,
            meta_description: None,
            category_id: post.category_id,
            tags: self.resolve_tags(&post.tag_ids),
        };
        self.posts.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_post(&self, post_id: i32, update: &UpdatePost) -> RepositoryResult<usize> {
        let tags = self.resolve_tags(&update.tag_ids);
        let mut posts = self.posts.borrow_mut();
        match posts.iter_mut().find(|p| p.id == post_id) {
            Some(post) => {
                post.title = update.title.clone();
                post.content = update.content.clone();
                post.is_published = update.is_published;
                post.category_id = update.category_id;
                post.tags = tags;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_post(&self, post_id: i32) -> RepositoryResult<usize> {
        let mut posts = self.posts.borrow_mut();
        let before = posts.len();
        posts.retain(|p| p.id != post_id);
        self.comments.borrow_mut().retain(|c| c.post_id != post_id);
        Ok(before - posts.len())
    }

    fn increment_views(&self, post_id: i32) -> RepositoryResult<usize> {
        let mut posts = self.posts.borrow_mut();
        match posts.iter_mut().find(|p| p.id == post_id) {
            Some(post) => {
                post.views += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl CommentReader for TestRepository {
    fn list_comments(&self, post_id: i32) -> RepositoryResult<Vec<Comment>> {
        Ok(self
            .comments
            .borrow()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    fn get_comment_by_id(&self, id: i32) -> RepositoryResult<Option<Comment>> {
        Ok(self.comments.borrow().iter().find(|c| c.id == id).cloned())
    }

    fn count_comments(&self) -> RepositoryResult<usize> {
        Ok(self.comments.borrow().len())
    }
}

impl CommentWriter for TestRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        let created = Comment {
            id: self.next_comment_id(),
            post_id: comment.post_id,
            author: comment.author.clone(),
            content: comment.content.clone(),
            created_at: Utc::now().naive_utc(),
        };
        self.comments.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn delete_comment(&self, id: i32) -> RepositoryResult<usize> {
        let mut comments = self.comments.borrow_mut();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(before - comments.len())
    }
}

impl TaxonomyReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn list_tags(&self) -> RepositoryResult<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<Category>> {
        Ok(self.categories.iter().find(|c| c.name == name).cloned())
    }

    fn get_tag_by_name(&self, name: &str) -> RepositoryResult<Option<Tag>> {
        Ok(self.tags.iter().find(|t| t.name == name).cloned())
    }
}
