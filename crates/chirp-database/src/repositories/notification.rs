//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use chirp_core::error::{AppError, ErrorKind};
use chirp_core::result::AppResult;
use chirp_entity::notification::{NotificationActor, NotificationType, NotificationView};

use crate::store::NotificationStore;

/// Repository for the notification ledger.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A notification joined with its actor.
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    from_user_id: Uuid,
    to_user_id: Uuid,
    kind: NotificationType,
    read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    username: String,
    profile_img: Option<String>,
}

impl From<NotificationRow> for NotificationView {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            from: NotificationActor {
                id: row.from_user_id,
                username: row.username,
                profile_img: row.profile_img,
            },
            to: row.to_user_id,
            kind: row.kind,
            read: row.read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn list_for_recipient(&self, recipient: Uuid) -> AppResult<Vec<NotificationView>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT n.id, n.from_user_id, n.to_user_id, n.kind, n.read, n.created_at, n.updated_at, \
                    u.username, u.profile_img \
             FROM notifications n \
             JOIN users u ON u.id = n.from_user_id \
             WHERE n.to_user_id = $1 \
             ORDER BY n.created_at DESC",
        )
        .bind(recipient)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        Ok(rows.into_iter().map(NotificationView::from).collect())
    }

    async fn mark_all_read(&self, recipient: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, updated_at = NOW() \
             WHERE to_user_id = $1 AND read = FALSE",
        )
        .bind(recipient)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark notifications read", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn delete_for_recipient(&self, recipient: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE to_user_id = $1")
            .bind(recipient)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notifications", e)
            })?;
        Ok(result.rows_affected())
    }
}
