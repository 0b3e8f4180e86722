//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! `posts.owner_id` is the authoritative ownership record; the per-user index
//! is maintained separately by [`super::DieselOwnershipLedger`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{Likes, Post, PostId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    let likes = Likes::new(row.likes)
        .map_err(|err| PostRepositoryError::query(format!("stored likes invalid: {err}")))?;
    Ok(Post::from_parts(
        PostId::from_uuid(row.id),
        UserId::from_uuid(row.owner_id),
        row.title,
        row.author,
        row.url,
        likes,
    ))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewPostRow {
            id: *post.id().as_uuid(),
            owner_id: *post.owner().as_uuid(),
            title: post.title(),
            author: post.author(),
            url: post.url(),
            likes: i64::from(post.likes().get()),
        };

        diesel::insert_into(posts::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PostRow> = posts::table
            .find(*id.as_uuid())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_post).transpose()
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = PostUpdate {
            title: post.title(),
            author: post.author(),
            url: post.url(),
            likes: i64::from(post.likes().get()),
        };

        let row: Option<PostRow> = diesel::update(posts::table.find(*post.id().as_uuid()))
            .set(&changes)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_post).transpose()
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(posts::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn list(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PostRow> = posts::table
            .order((posts::created_at.asc(), posts::id.asc()))
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_post).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage.
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(likes: i64) -> PostRow {
        PostRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Go To Statement Considered Harmful".to_owned(),
            author: "Edsger W. Dijkstra".to_owned(),
            url: "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html".to_owned(),
            likes,
        }
    }

    #[rstest]
    fn rows_convert_to_posts() {
        let source = row(5);
        let owner = UserId::from_uuid(source.owner_id);
        let post = row_to_post(source).expect("valid row");
        assert!(post.is_owned_by(&owner));
        assert_eq!(post.likes().get(), 5);
        assert_eq!(post.author(), "Edsger W. Dijkstra");
    }

    #[rstest]
    fn negative_likes_are_rejected() {
        let err = row_to_post(row(-1)).expect_err("negative likes");
        assert!(matches!(err, PostRepositoryError::Query { .. }));
    }
}
