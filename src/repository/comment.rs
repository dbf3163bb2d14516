use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_comments(&self, post_id: i32) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let items = comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::created_at.asc())
            .load::<DbComment>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(items)
    }

    fn get_comment_by_id(&self, id: i32) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let comment = comments::table
            .find(id)
            .first::<DbComment>(&mut conn)
            .optional()?;

        Ok(comment.map(Into::into))
    }

    fn count_comments(&self) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let total: i64 = comments::table.count().get_result(&mut conn)?;
        Ok(total as usize)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let db_comment: DbNewComment = comment.into();

        let created: DbComment = diesel::insert_into(comments::table)
            .values(&db_comment)
            .get_result(&mut conn)?;

        Ok(created.into())
    }

    fn delete_comment(&self, id: i32) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::delete(comments::table.find(id)).execute(&mut conn)?;
        Ok(affected)
    }
}
