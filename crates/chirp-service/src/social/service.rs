//! Follow and like toggles.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_database::GraphStore;
use chirp_entity::graph::{FollowAction, LikeToggle};

use crate::context::RequestContext;

/// Mutates the follow and like relations on behalf of the caller.
#[derive(Clone)]
pub struct SocialGraphService {
    graph: Arc<dyn GraphStore>,
}

impl std::fmt::Debug for SocialGraphService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialGraphService").finish_non_exhaustive()
    }
}

impl SocialGraphService {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    /// Follow `target` if the caller does not follow them yet, otherwise
    /// unfollow. Targeting oneself always fails.
    pub async fn toggle_follow(
        &self,
        ctx: &RequestContext,
        target: Uuid,
    ) -> AppResult<FollowAction> {
        if target == ctx.user_id() {
            return Err(AppError::self_reference(
                "You can't follow/unfollow yourself",
            ));
        }

        let action = self.graph.toggle_follow(ctx.user_id(), target).await?;
        info!(user_id = %ctx.user_id(), target = %target, ?action, "Follow toggled");
        Ok(action)
    }

    /// Like `post_id` if the caller has not liked it yet, otherwise unlike.
    pub async fn toggle_like(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<LikeToggle> {
        let result = self.graph.toggle_like(ctx.user_id(), post_id).await?;
        info!(user_id = %ctx.user_id(), post_id = %post_id, liked = result.liked, "Like toggled");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use chirp_core::ErrorKind;
    use chirp_entity::notification::NotificationType;

    use super::*;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_follow_then_unfollow_restores_graph() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let bob = h.signup("bob").await;

        let action = h.social.toggle_follow(&h.ctx(&alice).await, bob.id).await.unwrap();
        assert_eq!(action, FollowAction::Followed);
        assert_eq!(h.ctx(&alice).await.user.following, vec![bob.id]);
        assert_eq!(h.ctx(&bob).await.user.followers, vec![alice.id]);

        let notes = h.notifications.fetch(&h.ctx(&bob).await).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].from.id, alice.id);
        assert_eq!(notes[0].to, bob.id);
        assert_eq!(notes[0].kind, NotificationType::Follow);
        assert!(!notes[0].read);

        let action = h.social.toggle_follow(&h.ctx(&alice).await, bob.id).await.unwrap();
        assert_eq!(action, FollowAction::Unfollowed);
        assert!(h.ctx(&alice).await.user.following.is_empty());
        assert!(h.ctx(&bob).await.user.followers.is_empty());
        assert_eq!(h.notifications.fetch(&h.ctx(&bob).await).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_self_follow_always_rejected() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let ctx = h.ctx(&alice).await;

        for _ in 0..2 {
            let err = h.social.toggle_follow(&ctx, alice.id).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::SelfReferenceNotAllowed);
        }
        let err = h.social.toggle_follow(&ctx, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_like_twice_restores_likes() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let bob = h.signup("bob").await;
        let post = h
            .posts
            .create(&h.ctx(&alice).await, Some("like me".into()), None)
            .await
            .unwrap();
        let bob_ctx = h.ctx(&bob).await;

        let liked = h.social.toggle_like(&bob_ctx, post.id).await.unwrap();
        assert!(liked.liked);
        assert_eq!(liked.likes, vec![bob.id]);

        let unliked = h.social.toggle_like(&bob_ctx, post.id).await.unwrap();
        assert!(!unliked.liked);
        assert_eq!(unliked.likes.len(), post.likes.len());

        let notes = h.notifications.fetch(&h.ctx(&alice).await).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationType::Like);

        let err = h.social.toggle_like(&bob_ctx, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
