//! Notification type enum.

use serde::{Deserialize, Serialize};

/// Kind of social event a notification records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Someone followed the recipient.
    Follow,
    /// Someone liked one of the recipient's posts.
    Like,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Follow => write!(f, "follow"),
            Self::Like => write!(f, "like"),
        }
    }
}
