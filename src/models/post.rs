use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::Post as DomainPost;
use crate::domain::taxonomy::Tag;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub views: i32,
    pub image: Option<String>,
    pub is_published: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub image: Option<&'a str>,
    pub is_published: bool,
    pub category_id: Option<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::post_tags)]
pub struct NewPostTag {
    pub post_id: i32,
    pub tag_id: i32,
}

impl Post {
    /// Attach the tags loaded for this row and convert into the domain type.
    pub fn into_domain(self, tags: Vec<Tag>) -> DomainPost {
        DomainPost {
            id: self.id,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            views: self.views,
            image: self.image,
            is_published: self.is_published,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            category_id: self.category_id,
            tags,
        }
    }
}
