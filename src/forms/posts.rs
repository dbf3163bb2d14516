use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;

/// Admin post form. Multipart because of the optional image and the
/// multi-valued tag selection.
#[derive(MultipartForm)]
pub struct PostForm {
    pub title: Text<String>,
    pub content: Text<String>,
    pub category_id: Option<Text<String>>,
    pub tags: Vec<Text<i32>>,
    /// Checkbox; present when checked.
    pub is_published: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
}

/// Contributor/edit form: same fields minus the image upload.
#[derive(MultipartForm)]
pub struct EditPostForm {
    pub title: Text<String>,
    pub content: Text<String>,
    pub category_id: Option<Text<String>>,
    pub tags: Vec<Text<i32>>,
    pub is_published: Option<Text<String>>,
}

/// Validated post fields shared by create, submit and edit operations.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFormPayload {
    pub title: String,
    pub content: String,
    /// `None` when the select was empty or did not parse; unresolvable
    /// references are nulled rather than rejected.
    pub category_id: Option<i32>,
    pub tag_ids: Vec<i32>,
    pub is_published: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostFormError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Content is required")]
    MissingContent,
}

fn build_payload(
    title: String,
    content: String,
    category_id: Option<String>,
    tag_ids: Vec<i32>,
    is_published: bool,
) -> Result<PostFormPayload, PostFormError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(PostFormError::MissingTitle);
    }
    if content.trim().is_empty() {
        return Err(PostFormError::MissingContent);
    }

    let category_id = category_id
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| c.parse::<i32>().ok());

    Ok(PostFormPayload {
        title,
        content,
        category_id,
        tag_ids,
        is_published,
    })
}

impl PostForm {
    /// Validate the text fields, splitting off the uploaded image for the
    /// caller to persist separately.
    pub fn into_payload(self) -> Result<(PostFormPayload, Option<TempFile>), PostFormError> {
        let payload = build_payload(
            self.title.into_inner(),
            self.content.into_inner(),
            self.category_id.map(Text::into_inner),
            self.tags.into_iter().map(Text::into_inner).collect(),
            self.is_published.is_some(),
        )?;
        Ok((payload, self.image))
    }
}

impl TryFrom<EditPostForm> for PostFormPayload {
    type Error = PostFormError;

    fn try_from(form: EditPostForm) -> Result<Self, Self::Error> {
        build_payload(
            form.title.into_inner(),
            form.content.into_inner(),
            form.category_id.map(Text::into_inner),
            form.tags.into_iter().map(Text::into_inner).collect(),
            form.is_published.is_some(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_title_and_content() {
        assert_eq!(
            build_payload("  ".into(), "body".into(), None, vec![], false),
            Err(PostFormError::MissingTitle)
        );
        assert_eq!(
            build_payload("title".into(), "\n".into(), None, vec![], false),
            Err(PostFormError::MissingContent)
        );
    }

    #[test]
    fn empty_category_select_becomes_none() {
        let payload =
            build_payload("t".into(), "c".into(), Some("".into()), vec![], true).unwrap();
        assert_eq!(payload.category_id, None);
        assert!(payload.is_published);
    }

    #[test]
    fn non_numeric_category_is_nulled_not_rejected() {
        let payload =
            build_payload("t".into(), "c".into(), Some("nope".into()), vec![1, 2], false)
                .unwrap();
        assert_eq!(payload.category_id, None);
        assert_eq!(payload.tag_ids, vec![1, 2]);
    }
}
