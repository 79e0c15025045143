//! Transactional follow and like toggles.
//!
//! Each toggle locks every row it reads with `SELECT ... FOR UPDATE` inside a
//! single transaction, so concurrent toggles on the same edge serialize.
//! Lock order is fixed: posts before users, users by ascending id.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use chirp_core::error::{AppError, ErrorKind};
use chirp_core::result::AppResult;
use chirp_entity::graph::{FollowAction, LikeToggle};
use chirp_entity::notification::{Notification, NotificationType};

use crate::store::GraphStore;

/// Repository that mutates paired social edges.
#[derive(Debug, Clone)]
pub struct GraphRepository {
    pool: PgPool,
}

impl GraphRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }
}

async fn insert_notification(
    tx: &mut Transaction<'static, Postgres>,
    notification: &Notification,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO notifications (id, from_user_id, to_user_id, kind, read, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(notification.id)
    .bind(notification.from_user_id)
    .bind(notification.to_user_id)
    .bind(notification.kind)
    .bind(notification.read)
    .bind(notification.created_at)
    .bind(notification.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record notification", e))?;
    Ok(())
}

async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit toggle", e))
}

#[async_trait]
impl GraphStore for GraphRepository {
    async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> AppResult<FollowAction> {
        if actor == target {
            return Err(AppError::self_reference("You can't follow/unfollow yourself"));
        }

        let ids = [actor, target];
        let mut tx = self.begin().await?;

        let locked: Vec<(Uuid, Vec<Uuid>)> = sqlx::query_as(
            "SELECT id, following FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(&ids[..])
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock users", e))?;

        if locked.len() != 2 {
            return Err(AppError::not_found("User not found"));
        }
        let already_following = locked
            .iter()
            .find(|(id, _)| *id == actor)
            .is_some_and(|(_, following)| following.contains(&target));

        let action = if already_following {
            sqlx::query(
                "UPDATE users SET following = array_remove(following, $2), updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(actor)
            .bind(target)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unfollow", e))?;

            sqlx::query(
                "UPDATE users SET followers = array_remove(followers, $2), updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(target)
            .bind(actor)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unfollow", e))?;

            FollowAction::Unfollowed
        } else {
            sqlx::query(
                "UPDATE users SET following = array_append(following, $2), updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(actor)
            .bind(target)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to follow", e))?;

            sqlx::query(
                "UPDATE users SET followers = array_append(followers, $2), updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(target)
            .bind(actor)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to follow", e))?;

            insert_notification(
                &mut tx,
                &Notification::new(actor, target, NotificationType::Follow),
            )
            .await?;

            FollowAction::Followed
        };

        commit(tx).await?;
        debug!(actor = %actor, target = %target, ?action, "Follow toggled");
        Ok(action)
    }

    async fn toggle_like(&self, actor: Uuid, post_id: Uuid) -> AppResult<LikeToggle> {
        let mut tx = self.begin().await?;

        let post: Option<(Uuid, Vec<Uuid>)> =
            sqlx::query_as("SELECT user_id, likes FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock post", e))?;
        let (owner, likes) = post.ok_or_else(|| AppError::not_found("Post not found"))?;

        let actor_exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(actor)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock user", e))?;
        if actor_exists.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let liked = !likes.contains(&actor);
        let (likes_sql, liked_posts_sql) = if liked {
            (
                "UPDATE posts SET likes = array_append(likes, $2), updated_at = NOW() \
                 WHERE id = $1 RETURNING likes",
                "UPDATE users SET liked_posts = array_append(liked_posts, $2), updated_at = NOW() \
                 WHERE id = $1",
            )
        } else {
            (
                "UPDATE posts SET likes = array_remove(likes, $2), updated_at = NOW() \
                 WHERE id = $1 RETURNING likes",
                "UPDATE users SET liked_posts = array_remove(liked_posts, $2), updated_at = NOW() \
                 WHERE id = $1",
            )
        };

        let likes: Vec<Uuid> = sqlx::query_scalar(likes_sql)
            .bind(post_id)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update likes", e))?;

        sqlx::query(liked_posts_sql)
            .bind(actor)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update liked posts", e)
            })?;

        if liked {
            insert_notification(&mut tx, &Notification::new(actor, owner, NotificationType::Like))
                .await?;
        }

        commit(tx).await?;
        debug!(actor = %actor, post_id = %post_id, liked, "Like toggled");
        Ok(LikeToggle { liked, likes })
    }
}
