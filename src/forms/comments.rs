use serde::Deserialize;

/// Public comment form. Absent or blank content makes the submission a
/// silent no-op, so no validation error is ever surfaced.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub author: Option<String>,
    pub content: Option<String>,
}

impl CommentForm {
    /// Content with surrounding whitespace removed, `None` when effectively
    /// empty.
    pub fn trimmed_content(&self) -> Option<String> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    /// Author name, blank treated as anonymous.
    pub fn trimmed_author(&self) -> Option<String> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_treated_as_absent() {
        let form = CommentForm {
            author: Some("  ".into()),
            content: Some("   ".into()),
        };
        assert_eq!(form.trimmed_content(), None);
        assert_eq!(form.trimmed_author(), None);
    }

    #[test]
    fn content_and_author_are_trimmed() {
        let form = CommentForm {
            author: Some(" Ada ".into()),
            content: Some(" nice post ".into()),
        };
        assert_eq!(form.trimmed_content().as_deref(), Some("nice post"));
        assert_eq!(form.trimmed_author().as_deref(), Some("Ada"));
    }
}
