//! Post operations: create, delete, comment and the feed listings.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_core::traits::ImageHost;
use chirp_database::{PostStore, UserStore};
use chirp_entity::post::{Comment, CreatePost, Post, PostView};

use super::feed::populate;
use crate::context::RequestContext;
use crate::user::service::non_empty;

/// Handles post lifecycle and listing.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
    images: Arc<dyn ImageHost>,
}

impl std::fmt::Debug for PostService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostService")
            .field("images", &self.images)
            .finish()
    }
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserStore>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            posts,
            users,
            images,
        }
    }

    /// Create a post from optional text and an optional image payload.
    ///
    /// The image is uploaded first and its hosted URL stored on the post.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        text: Option<String>,
        img: Option<String>,
    ) -> AppResult<PostView> {
        let text = non_empty(text).filter(|t| !t.trim().is_empty());
        let payload = non_empty(img);
        if text.is_none() && payload.is_none() {
            return Err(AppError::validation("Post must have text or image"));
        }

        let img = match payload {
            Some(payload) => Some(self.images.upload(&payload).await?),
            None => None,
        };

        let created = self
            .posts
            .create(&CreatePost {
                user_id: ctx.user_id(),
                text,
                img: img.clone(),
            })
            .await;
        let post = match created {
            Ok(post) => post,
            Err(e) => {
                if let Some(url) = &img {
                    if let Err(release) = self.images.destroy_url(url).await {
                        warn!(url, error = %release, "Failed to release image of unsaved post");
                    }
                }
                return Err(e);
            }
        };

        info!(user_id = %ctx.user_id(), post_id = %post.id, "Post created");
        Ok(PostView::new(post, ctx.user.summary(), Vec::new()))
    }

    /// Delete one of the caller's posts and release its image.
    pub async fn delete(&self, ctx: &RequestContext, post_id: Uuid) -> AppResult<()> {
        let post = self.find(post_id).await?;
        if !post.is_owned_by(ctx.user_id()) {
            return Err(AppError::forbidden(
                "You are not authorized to delete this post",
            ));
        }

        if let Some(url) = &post.img {
            self.images.destroy_url(url).await?;
        }
        self.posts.delete(post.id).await?;

        info!(user_id = %ctx.user_id(), post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Append a comment by the caller and return the updated post.
    pub async fn comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        text: Option<String>,
    ) -> AppResult<PostView> {
        let text = text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("Text field is required"))?;

        let post = self.find(post_id).await?;
        self.posts
            .add_comment(&Comment::new(post.id, ctx.user_id(), text))
            .await?;

        let post = self.find(post_id).await?;
        self.populate_one(post).await
    }

    /// Every post, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<PostView>> {
        let posts = self.posts.list_all().await?;
        self.populate(posts).await
    }

    /// Posts by users the caller follows, newest first.
    pub async fn list_following(&self, ctx: &RequestContext) -> AppResult<Vec<PostView>> {
        let posts = self.posts.list_by_authors(&ctx.user.following).await?;
        self.populate(posts).await
    }

    /// Posts authored by `username`, newest first.
    pub async fn list_by_username(&self, username: &str) -> AppResult<Vec<PostView>> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let posts = self.posts.list_by_authors(&[user.id]).await?;
        self.populate(posts).await
    }

    /// Posts liked by `user_id`, newest first.
    pub async fn list_liked(&self, user_id: Uuid) -> AppResult<Vec<PostView>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let posts = self.posts.list_by_ids(&user.liked_posts).await?;
        self.populate(posts).await
    }

    async fn find(&self, post_id: Uuid) -> AppResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    async fn populate(&self, posts: Vec<Post>) -> AppResult<Vec<PostView>> {
        populate(posts, self.posts.as_ref(), self.users.as_ref()).await
    }

    async fn populate_one(&self, post: Post) -> AppResult<PostView> {
        self.populate(vec![post])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Post author could not be resolved"))
    }
}

#[cfg(test)]
mod tests {
    use chirp_core::ErrorKind;

    use super::*;
    use crate::testing::{Harness, png_payload};

    #[tokio::test]
    async fn test_create_requires_text_or_image() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let ctx = h.ctx(&alice).await;

        let err = h.posts.create(&ctx, None, None).await.unwrap_err();
        assert_eq!(err.message, "Post must have text or image");
        let err = h
            .posts
            .create(&ctx, Some("   ".into()), Some(String::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let text_only = h.posts.create(&ctx, Some("hi".into()), None).await.unwrap();
        assert_eq!(text_only.text.as_deref(), Some("hi"));
        assert!(text_only.img.is_none());
        assert_eq!(text_only.user.username, "alice");

        let image_only = h.posts.create(&ctx, None, Some(png_payload())).await.unwrap();
        let url = image_only.img.unwrap();
        assert!(h.image_exists(&url));
    }

    #[tokio::test]
    async fn test_failed_create_releases_uploaded_image() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let mut ghost = h.ctx(&alice).await;
        ghost.user.id = Uuid::new_v4();

        let err = h
            .posts
            .create(&ghost, Some("hi".into()), Some(png_payload()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(h.stored_image_count(), 0);
        assert!(h.posts.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden_and_changes_nothing() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let bob = h.signup("bob").await;
        let post = h
            .posts
            .create(&h.ctx(&alice).await, Some("mine".into()), Some(png_payload()))
            .await
            .unwrap();
        let url = post.img.clone().unwrap();

        let err = h.posts.delete(&h.ctx(&bob).await, post.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(h.image_exists(&url));
        assert_eq!(h.posts.list_all().await.unwrap().len(), 1);

        h.posts.delete(&h.ctx(&alice).await, post.id).await.unwrap();
        assert!(!h.image_exists(&url));
        assert!(h.posts.list_all().await.unwrap().is_empty());

        let err = h.posts.delete(&h.ctx(&alice).await, post.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_comment_appends_with_author() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let bob = h.signup("bob").await;
        let post = h
            .posts
            .create(&h.ctx(&alice).await, Some("hello".into()), None)
            .await
            .unwrap();

        let bob_ctx = h.ctx(&bob).await;
        let err = h
            .posts
            .comment(&bob_ctx, post.id, Some("  ".into()))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Text field is required");

        let err = h
            .posts
            .comment(&bob_ctx, Uuid::new_v4(), Some("hey".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        h.posts.comment(&bob_ctx, post.id, Some("first".into())).await.unwrap();
        let view = h
            .posts
            .comment(&h.ctx(&alice).await, post.id, Some("second".into()))
            .await
            .unwrap();
        let texts: Vec<&str> = view.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(view.comments[0].user.username, "bob");

        // Comments never notify.
        let notes = h.notifications.fetch(&h.ctx(&alice).await).await.unwrap();
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_feed_listings() {
        let h = Harness::new().await;
        let alice = h.signup("alice").await;
        let bob = h.signup("bob").await;
        let carol = h.signup("carol").await;

        let p_bob = h
            .posts
            .create(&h.ctx(&bob).await, Some("from bob".into()), None)
            .await
            .unwrap();
        let p_carol = h
            .posts
            .create(&h.ctx(&carol).await, Some("from carol".into()), None)
            .await
            .unwrap();

        h.social.toggle_follow(&h.ctx(&alice).await, bob.id).await.unwrap();
        h.social.toggle_like(&h.ctx(&alice).await, p_carol.id).await.unwrap();

        let following = h.posts.list_following(&h.ctx(&alice).await).await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, p_bob.id);

        let by_carol = h.posts.list_by_username("carol").await.unwrap();
        assert_eq!(by_carol.len(), 1);
        assert_eq!(by_carol[0].user.username, "carol");

        let liked = h.posts.list_liked(alice.id).await.unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, p_carol.id);

        let all = h.posts.list_all().await.unwrap();
        assert_eq!(all[0].id, p_carol.id);
        assert_eq!(all[1].id, p_bob.id);

        assert_eq!(
            h.posts.list_by_username("nobody").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            h.posts.list_liked(Uuid::new_v4()).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
