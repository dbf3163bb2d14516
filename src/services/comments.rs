//! Public comment creation. Deletion lives in the admin service.

use crate::domain::comment::NewComment;
use crate::forms::comments::CommentForm;
use crate::repository::{CommentWriter, PostReader};

use super::{ServiceError, ServiceResult};

/// Attach a comment to a published post.
///
/// Empty content is a silent no-op; an unpublished target is rejected with
/// `Unauthorized` (the route redirects to the listing without creating
/// anything); an unknown post is `NotFound`.
pub fn add_comment<R>(post_id: i32, form: &CommentForm, repo: &R) -> ServiceResult<()>
where
    R: PostReader + CommentWriter,
{
    let post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load post {post_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !post.is_published {
        return Err(ServiceError::Unauthorized);
    }

    let Some(content) = form.trimmed_content() else {
        return Ok(());
    };

    let comment = NewComment {
        post_id,
        author: form.trimmed_author(),
        content,
    };

    match repo.create_comment(&comment) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to create comment on post {post_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::Post;
    use crate::repository::CommentReader;
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn post(id: i32, published: bool) -> Post {
        Post {
            id,
            title: "Post".into(),
            content: "content".into(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            views: 0,
            image: None,
            is_published: published,
            meta_title: None,
            meta_description: None,
            category_id: None,
            tags: vec![],
        }
    }

    fn form(author: Option<&str>, content: Option<&str>) -> CommentForm {
        CommentForm {
            author: author.map(Into::into),
            content: content.map(Into::into),
        }
    }

    #[test]
    fn creates_comment_on_published_post() {
        let repo = TestRepository::new().with_posts(vec![post(1, true)]);

        add_comment(1, &form(Some("Ada"), Some("nice")), &repo).unwrap();
        let comments = repo.list_comments(1).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author.as_deref(), Some("Ada"));
    }

    #[test]
    fn empty_content_is_a_silent_noop() {
        let repo = TestRepository::new().with_posts(vec![post(1, true)]);

        add_comment(1, &form(None, None), &repo).unwrap();
        add_comment(1, &form(None, Some("   ")), &repo).unwrap();
        assert_eq!(repo.count_comments().unwrap(), 0);
    }

    #[test]
    fn unpublished_post_rejects_comments() {
        let repo = TestRepository::new().with_posts(vec![post(1, false)]);

        assert_eq!(
            add_comment(1, &form(None, Some("hi")), &repo).unwrap_err(),
            ServiceError::Unauthorized
        );
        assert_eq!(repo.count_comments().unwrap(), 0);
    }

    #[test]
    fn unknown_post_is_not_found() {
        let repo = TestRepository::new();
        assert_eq!(
            add_comment(9, &form(None, Some("hi")), &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }
}
