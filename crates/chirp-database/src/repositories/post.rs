//! Post and comment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use chirp_core::error::{AppError, ErrorKind};
use chirp_core::result::AppResult;
use chirp_entity::post::{Comment, CreatePost, Post};

use crate::store::PostStore;

/// Repository for posts and comments.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post", e))
    }

    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        let post = Post::from_create(data);
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, user_id, text, img, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.text)
        .bind(&post.img)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Post row first, matching the lock order of the like toggle.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock post", e))?;
        if locked.is_none() {
            return Err(AppError::not_found("Post not found"));
        }

        sqlx::query(
            "UPDATE users SET liked_posts = array_remove(liked_posts, $1) \
             WHERE $1 = ANY(liked_posts)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unlink likes", e))?;

        // Comments go with the post through ON DELETE CASCADE.
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit post deletion", e)
        })
    }

    async fn add_comment(&self, comment: &Comment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, user_id, text, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("comments_post_id_fkey") =>
            {
                AppError::not_found("Post not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to add comment", e),
        })?;
        Ok(())
    }

    async fn comments_for(&self, post_ids: &[Uuid]) -> AppResult<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = ANY($1) ORDER BY created_at ASC, id ASC",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load comments", e))
    }

    async fn list_all(&self) -> AppResult<Vec<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))
    }

    async fn list_by_authors(&self, author_ids: &[Uuid]) -> AppResult<Vec<Post>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE user_id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(author_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list posts by author", e)
        })
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Post>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ANY($1) ORDER BY created_at DESC")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))
    }
}

#[cfg(test)]
mod tests {
    use chirp_core::config::{DatabaseConfig, DatabaseProvider};
    use chirp_core::error::ErrorKind;
    use chirp_entity::user::CreateUser;

    use super::*;
    use crate::store::Stores;

    /// Connect to the database named by `CHIRP_TEST_DATABASE_URL`, if set.
    async fn stores() -> Option<Stores> {
        let url = std::env::var("CHIRP_TEST_DATABASE_URL").ok()?;
        let config = DatabaseConfig {
            provider: DatabaseProvider::Postgres,
            url,
            ..Default::default()
        };
        Some(Stores::connect(&config).await.unwrap())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_delete_racing_likes_leaves_no_dangling_ids() {
        let Some(stores) = stores().await else {
            return;
        };
        let tag = Uuid::new_v4().simple().to_string();
        let liker = stores
            .users
            .create(&CreateUser {
                username: format!("liker-{tag}"),
                full_name: "Liker".into(),
                email: format!("liker-{tag}@example.com"),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();

        for _ in 0..20 {
            let post = stores
                .posts
                .create(&CreatePost {
                    user_id: liker.id,
                    text: Some("racing".into()),
                    img: None,
                })
                .await
                .unwrap();
            stores.graph.toggle_like(liker.id, post.id).await.unwrap();

            let (liker_id, post_id) = (liker.id, post.id);
            let graph = stores.graph.clone();
            let unlike = tokio::spawn(async move { graph.toggle_like(liker_id, post_id).await });
            let posts = stores.posts.clone();
            let delete = tokio::spawn(async move { posts.delete(post_id).await });

            delete.await.unwrap().unwrap();
            if let Err(err) = unlike.await.unwrap() {
                assert_eq!(err.kind, ErrorKind::NotFound);
            }

            let user = stores.users.find_by_id(liker.id).await.unwrap().unwrap();
            assert!(!user.liked_posts.contains(&post.id));
            assert!(stores.posts.find_by_id(post.id).await.unwrap().is_none());
        }

        let err = stores.posts.delete(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
