//! Outcomes of social-graph toggles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    /// The edge was added and a notification recorded.
    Followed,
    /// The edge was removed.
    Unfollowed,
}

impl FollowAction {
    /// Client-facing confirmation message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Followed => "User followed successfully",
            Self::Unfollowed => "User unfollowed successfully",
        }
    }
}

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    /// Whether the post is now liked by the actor.
    pub liked: bool,
    /// The post's resulting `likes` set.
    pub likes: Vec<Uuid>,
}
