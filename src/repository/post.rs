use std::collections::HashMap;

use diesel::prelude::*;

use crate::db::DbConnection;
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::taxonomy::Tag;
use crate::models::post::{NewPost as DbNewPost, NewPostTag, Post as DbPost};
use crate::models::taxonomy::Tag as DbTag;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PostListQuery, PostReader, PostWriter};

diesel::define_sql_function! {
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Tags for a set of posts, keyed by post id.
fn load_tags(
    conn: &mut DbConnection,
    post_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<Tag>>> {
    use crate::schema::{post_tags, tags};

    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, DbTag)> = post_tags::table
        .inner_join(tags::table)
        .filter(post_tags::post_id.eq_any(post_ids))
        .select((post_tags::post_id, tags::all_columns))
        .order(tags::name.asc())
        .load(conn)?;

    let mut by_post: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (post_id, tag) in rows {
        by_post.entry(post_id).or_default().push(tag.into());
    }
    Ok(by_post)
}

fn attach_tags(conn: &mut DbConnection, rows: Vec<DbPost>) -> RepositoryResult<Vec<Post>> {
    let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
    let mut tags = load_tags(conn, &ids)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let post_tags = tags.remove(&row.id).unwrap_or_default();
            row.into_domain(post_tags)
        })
        .collect())
}

/// Insert tag links for a post, dropping ids that do not resolve to an
/// existing tag.
fn replace_tag_links(
    conn: &mut SqliteConnection,
    post_id: i32,
    tag_ids: &[i32],
) -> Result<(), diesel::result::Error> {
    use crate::schema::{post_tags, tags};

    diesel::delete(post_tags::table.filter(post_tags::post_id.eq(post_id))).execute(conn)?;

    let existing: Vec<i32> = tags::table
        .filter(tags::id.eq_any(tag_ids))
        .select(tags::id)
        .load(conn)?;

    let links: Vec<NewPostTag> = existing
        .into_iter()
        .map(|tag_id| NewPostTag { post_id, tag_id })
        .collect();

    diesel::insert_into(post_tags::table)
        .values(&links)
        .execute(conn)?;

    Ok(())
}

impl PostReader for DieselRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        use crate::schema::{post_tags, posts};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = posts::table.into_boxed::<diesel::sqlite::Sqlite>();

            if query.published_only {
                items = items.filter(posts::is_published.eq(true));
            }

            if let Some(category_id) = query.category_id {
                items = items.filter(posts::category_id.eq(category_id));
            }

            if let Some(tag_id) = query.tag_id {
                items = items.filter(
                    posts::id.eq_any(
                        post_tags::table
                            .filter(post_tags::tag_id.eq(tag_id))
                            .select(post_tags::post_id),
                    ),
                );
            }

            if let Some(search) = &query.search {
                let pattern = format!("%{}%", search.to_lowercase());
                items = items.filter(
                    lower(posts::title)
                        .like(pattern.clone())
                        .or(lower(posts::content).like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .order(posts::created_at.desc())
            .load::<DbPost>(&mut conn)?;

        Ok((total, attach_tags(&mut conn, rows)?))
    }

    fn get_post_by_id(&self, id: i32) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let row = posts::table
            .find(id)
            .first::<DbPost>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(attach_tags(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn count_posts(&self) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let total: i64 = posts::table.count().get_result(&mut conn)?;
        Ok(total as usize)
    }

    fn most_viewed_post(&self) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let row = posts::table
            .order(posts::views.desc())
            .first::<DbPost>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(attach_tags(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let row = conn.transaction::<DbPost, RepositoryError, _>(|conn| {
            let db_post = DbNewPost {
                title: &post.title,
                content: &post.content,
                image: post.image.as_deref(),
                is_published: post.is_published,
                category_id: post.category_id,
            };

            let row: DbPost = diesel::insert_into(posts::table)
                .values(&db_post)
                .get_result(conn)?;

            replace_tag_links(conn, row.id, &post.tag_ids)?;

            Ok(row)
        })?;

        let id = row.id;
        let mut tags = load_tags(&mut conn, &[id])?;
        Ok(row.into_domain(tags.remove(&id).unwrap_or_default()))
    }

    fn update_post(&self, post_id: i32, update: &UpdatePost) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let affected = diesel::update(posts::table.find(post_id))
                .set((
                    posts::title.eq(&update.title),
                    posts::content.eq(&update.content),
                    posts::is_published.eq(update.is_published),
                    posts::category_id.eq(update.category_id),
                ))
                .execute(conn)?;

            if affected > 0 {
                replace_tag_links(conn, post_id, &update.tag_ids)?;
            }

            Ok(affected)
        })
    }

    fn delete_post(&self, post_id: i32) -> RepositoryResult<usize> {
        use crate::schema::{comments, post_tags, posts};

        let mut conn = self.conn()?;

        // Explicit deletes rather than relying on SQLite's foreign_keys
        // pragma being enabled for the connection.
        conn.transaction::<usize, RepositoryError, _>(|conn| {
            diesel::delete(comments::table.filter(comments::post_id.eq(post_id)))
                .execute(conn)?;
            diesel::delete(post_tags::table.filter(post_tags::post_id.eq(post_id)))
                .execute(conn)?;
            let affected =
                diesel::delete(posts::table.find(post_id)).execute(conn)?;
            Ok(affected)
        })
    }

    fn increment_views(&self, post_id: i32) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let affected = diesel::update(posts::table.find(post_id))
            .set(posts::views.eq(posts::views + 1))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
