use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::taxonomy::Tag;

/// Characters of content shown in listing excerpts.
pub const EXCERPT_LENGTH: usize = 200;
/// Characters used for the meta-description fallback.
pub const META_DESCRIPTION_LENGTH: usize = 160;
/// Assumed reading speed for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// A blog post together with its attached tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub views: i32,
    /// Sanitized filename of the uploaded cover image, if any. The public
    /// path is reconstructed by convention at render time.
    pub image: Option<String>,
    pub is_published: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub category_id: Option<i32>,
    pub tags: Vec<Tag>,
}

impl Post {
    /// First `length` characters of the content, with an ellipsis marker
    /// appended only when truncation occurred. A straight character slice;
    /// no word-boundary trimming.
    pub fn excerpt(&self, length: usize) -> String {
        if self.content.chars().count() <= length {
            return self.content.clone();
        }
        let cut: String = self.content.chars().take(length).collect();
        format!("{cut}...")
    }

    /// Estimated reading time, floored at one minute.
    pub fn reading_time(&self) -> String {
        let words = self.content.split_whitespace().count();
        let minutes = (words / WORDS_PER_MINUTE).max(1);
        format!("{minutes} min read")
    }

    /// SEO title, falling back to the post title.
    pub fn seo_title(&self) -> &str {
        self.meta_title.as_deref().unwrap_or(&self.title)
    }

    /// SEO description, falling back to a 160-character excerpt.
    pub fn seo_description(&self) -> String {
        match &self.meta_description {
            Some(description) => description.clone(),
            None => self.excerpt(META_DESCRIPTION_LENGTH),
        }
    }
}

/// Information required to create a new [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub is_published: bool,
    pub category_id: Option<i32>,
    /// Tag ids to attach; ids not resolving to an existing tag are dropped.
    pub tag_ids: Vec<i32>,
}

/// Full replacement of a post's editable fields, tag set included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatePost {
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub category_id: Option<i32>,
    pub tag_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn post_with_content(content: &str) -> Post {
        Post {
            id: 1,
            title: "Title".into(),
            content: content.into(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            views: 0,
            image: None,
            is_published: true,
            meta_title: None,
            meta_description: None,
            category_id: None,
            tags: vec![],
        }
    }

    #[test]
    fn excerpt_returns_full_content_when_short_enough() {
        let post = post_with_content("short");
        assert_eq!(post.excerpt(10), "short");
    }

    #[test]
    fn excerpt_truncates_with_ellipsis() {
        let post = post_with_content("Hello World, this is long");
        assert_eq!(post.excerpt(10), "Hello Worl...");
    }

    #[test]
    fn excerpt_never_exceeds_length_plus_marker() {
        let post = post_with_content(&"x".repeat(500));
        for n in [0, 1, 50, 200] {
            assert!(post.excerpt(n).chars().count() <= n + 3);
        }
    }

    #[test]
    fn reading_time_floors_at_one_minute() {
        assert_eq!(post_with_content("").reading_time(), "1 min read");
        assert_eq!(post_with_content("a few words").reading_time(), "1 min read");
    }

    #[test]
    fn reading_time_counts_two_minutes_for_500_words() {
        let post = post_with_content(&"word ".repeat(500));
        assert_eq!(post.reading_time(), "2 min read");
    }

    #[test]
    fn seo_fields_fall_back_when_absent() {
        let mut post = post_with_content(&"y".repeat(300));
        assert_eq!(post.seo_title(), "Title");
        assert_eq!(post.seo_description().chars().count(), 163);

        post.meta_title = Some("Override".into());
        post.meta_description = Some("Custom".into());
        assert_eq!(post.seo_title(), "Override");
        assert_eq!(post.seo_description(), "Custom");
    }
}
