//! Contributor post submission. Any logged-in identity may submit; only
//! admin submissions go live immediately, everything else waits for review.

use crate::auth::AuthenticatedUser;
use crate::domain::post::{NewPost, Post};
use crate::domain::taxonomy::{Category, Tag};
use crate::forms::posts::PostFormPayload;
use crate::repository::{PostWriter, TaxonomyReader};

use super::{ServiceError, ServiceResult};

/// Taxonomy choices for the submission form.
pub fn show_writer<R>(repo: &R) -> ServiceResult<(Vec<Category>, Vec<Tag>)>
where
    R: TaxonomyReader,
{
    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;
    let tags = repo.list_tags().map_err(|e| {
        log::error!("Failed to list tags: {e}");
        ServiceError::Internal
    })?;
    Ok((categories, tags))
}

/// Persist a submission. The publish state is decided by the submitter's
/// role alone; any flag on the form is ignored.
pub fn submit_post<R>(
    payload: PostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Post>
where
    R: PostWriter,
{
    let new_post = NewPost {
        title: payload.title,
        content: payload.content,
        image: None,
        is_published: user.is_admin,
        category_id: payload.category_id,
        tag_ids: payload.tag_ids,
    };

    repo.create_post(&new_post).map_err(|e| {
        log::error!("Failed to submit post: {e}");
        ServiceError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;

    fn payload(is_published: bool) -> PostFormPayload {
        PostFormPayload {
            title: "Draft".into(),
            content: "Body".into(),
            category_id: None,
            tag_ids: vec![],
            is_published,
        }
    }

    fn user(is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 1,
            username: "someone".into(),
            is_admin,
        }
    }

    #[test]
    fn contributor_submissions_are_always_unpublished() {
        let repo = TestRepository::new();
        // The form flag is ignored even when a contributor forges it.
        let post = submit_post(payload(true), &user(false), &repo).unwrap();
        assert!(!post.is_published);
    }

    #[test]
    fn admin_submissions_go_live_immediately() {
        let repo = TestRepository::new();
        let post = submit_post(payload(false), &user(true), &repo).unwrap();
        assert!(post.is_published);
    }
}
