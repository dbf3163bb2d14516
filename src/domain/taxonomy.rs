use serde::{Deserialize, Serialize};

/// Named grouping owning zero or more posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Named label attached to posts through the `post_tags` association.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}
