//! Populated post views returned to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Comment, Post};
use crate::user::UserSummary;

/// A comment with its author resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub user: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, user: UserSummary) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            user,
            created_at: comment.created_at,
        }
    }
}

/// A post with its author and comment authors resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub user: UserSummary,
    pub text: Option<String>,
    pub img: Option<String>,
    pub likes: Vec<Uuid>,
    /// Comments in insertion order.
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, user: UserSummary, comments: Vec<CommentView>) -> Self {
        Self {
            id: post.id,
            user,
            text: post.text,
            img: post.img,
            likes: post.likes,
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
