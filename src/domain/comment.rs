use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A visitor comment on a published post. Not bound to any account; the
/// author is an optional free-text name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author: Option<String>,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// Information required to insert a new [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub post_id: i32,
    pub author: Option<String>,
    pub content: String,
}
