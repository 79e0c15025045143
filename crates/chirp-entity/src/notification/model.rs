//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::NotificationType;

/// A persisted record of a directed social event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Actor that caused the event.
    #[serde(rename = "from")]
    pub from_user_id: Uuid,
    /// Recipient.
    #[serde(rename = "to")]
    pub to_user_id: Uuid,
    /// Event type.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Whether the recipient has fetched it.
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification.
    pub fn new(from_user_id: Uuid, to_user_id: Uuid, kind: NotificationType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            from_user_id,
            to_user_id,
            kind,
            read: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Actor details embedded in a notification view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificationActor {
    pub id: Uuid,
    pub username: String,
    pub profile_img: Option<String>,
}

/// A notification with its actor resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Uuid,
    pub from: NotificationActor,
    pub to: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationView {
    pub fn new(notification: Notification, from: NotificationActor) -> Self {
        Self {
            id: notification.id,
            from,
            to: notification.to_user_id,
            kind: notification.kind,
            read: notification.read,
            created_at: notification.created_at,
            updated_at: notification.updated_at,
        }
    }
}
