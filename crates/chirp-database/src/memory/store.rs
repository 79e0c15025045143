//! In-memory store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_entity::graph::{FollowAction, LikeToggle};
use chirp_entity::notification::{Notification, NotificationActor, NotificationType, NotificationView};
use chirp_entity::post::{Comment, CreatePost, Post};
use chirp_entity::user::{CreateUser, User};

use crate::store::{GraphStore, NotificationStore, PostStore, UserStore};

#[derive(Debug, Default)]
struct InnerState {
    /// Users indexed by id.
    users: HashMap<Uuid, User>,
    /// Posts in creation order.
    posts: Vec<Post>,
    /// Comments in creation order.
    comments: Vec<Comment>,
    /// Notifications in creation order.
    notifications: Vec<Notification>,
}

impl InnerState {
    fn handle_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn post_mut(&mut self, id: Uuid) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    /// Newest-first clones of posts matching `keep`.
    fn posts_newest_first(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        self.posts.iter().rev().filter(|p| keep(p)).cloned().collect()
    }
}

/// Store backed by process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<InnerState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state.handle_taken(&data.username, None) {
            return Err(AppError::conflict("Username is already taken"));
        }
        if state.email_taken(&data.email, None) {
            return Err(AppError::conflict("Email is already taken"));
        }
        let user = User::from_create(data);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, user: &User) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state.handle_taken(&user.username, Some(user.id)) {
            return Err(AppError::conflict("Username is already taken"));
        }
        if state.email_taken(&user.email, Some(user.id)) {
            return Err(AppError::conflict("Email is already taken"));
        }
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        stored.username = user.username.clone();
        stored.full_name = user.full_name.clone();
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        stored.bio = user.bio.clone();
        stored.link = user.link.clone();
        stored.profile_img = user.profile_img.clone();
        stored.cover_img = user.cover_img.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn sample_excluding(&self, exclude: Uuid, limit: usize) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut candidates: Vec<&User> = state.users.values().filter(|u| u.id != exclude).collect();
        candidates.shuffle(&mut rand::thread_rng());
        Ok(candidates.into_iter().take(limit).cloned().collect())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let state = self.state.lock().await;
        Ok(state.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&data.user_id) {
            return Err(AppError::not_found("User not found"));
        }
        let post = Post::from_create(data);
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Err(AppError::not_found("Post not found"));
        }
        state.comments.retain(|c| c.post_id != id);
        for user in state.users.values_mut() {
            user.liked_posts.retain(|p| *p != id);
        }
        Ok(())
    }

    async fn add_comment(&self, comment: &Comment) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let post = state
            .post_mut(comment.post_id)
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        post.updated_at = Utc::now();
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn comments_for(&self, post_ids: &[Uuid]) -> AppResult<Vec<Comment>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Post>> {
        Ok(self.state.lock().await.posts_newest_first(|_| true))
    }

    async fn list_by_authors(&self, author_ids: &[Uuid]) -> AppResult<Vec<Post>> {
        let state = self.state.lock().await;
        Ok(state.posts_newest_first(|p| author_ids.contains(&p.user_id)))
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Post>> {
        let state = self.state.lock().await;
        Ok(state.posts_newest_first(|p| ids.contains(&p.id)))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn list_for_recipient(&self, recipient: Uuid) -> AppResult<Vec<NotificationView>> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.to_user_id == recipient)
            .filter_map(|n| {
                let actor = state.users.get(&n.from_user_id)?;
                Some(NotificationView::new(
                    n.clone(),
                    NotificationActor {
                        id: actor.id,
                        username: actor.username.clone(),
                        profile_img: actor.profile_img.clone(),
                    },
                ))
            })
            .collect())
    }

    async fn mark_all_read(&self, recipient: Uuid) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut changed = 0;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.to_user_id == recipient && !n.read)
        {
            n.read = true;
            n.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_for_recipient(&self, recipient: Uuid) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.to_user_id != recipient);
        Ok((before - state.notifications.len()) as u64)
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> AppResult<FollowAction> {
        if actor == target {
            return Err(AppError::self_reference("You can't follow/unfollow yourself"));
        }

        let mut state = self.state.lock().await;
        if !state.users.contains_key(&target) {
            return Err(AppError::not_found("User not found"));
        }
        let now = Utc::now();
        let actor_user = state
            .users
            .get_mut(&actor)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let action = if actor_user.is_following(target) {
            actor_user.following.retain(|id| *id != target);
            FollowAction::Unfollowed
        } else {
            actor_user.following.push(target);
            FollowAction::Followed
        };
        actor_user.updated_at = now;

        if let Some(target_user) = state.users.get_mut(&target) {
            match action {
                FollowAction::Unfollowed => target_user.followers.retain(|id| *id != actor),
                FollowAction::Followed => target_user.followers.push(actor),
            }
            target_user.updated_at = now;
        }

        if action == FollowAction::Followed {
            state
                .notifications
                .push(Notification::new(actor, target, NotificationType::Follow));
        }

        debug!(actor = %actor, target = %target, ?action, "Follow toggled");
        Ok(action)
    }

    async fn toggle_like(&self, actor: Uuid, post_id: Uuid) -> AppResult<LikeToggle> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&actor) {
            return Err(AppError::not_found("User not found"));
        }
        let now = Utc::now();
        let post = state
            .post_mut(post_id)
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        let liked = !post.is_liked_by(actor);
        if liked {
            post.likes.push(actor);
        } else {
            post.likes.retain(|id| *id != actor);
        }
        post.updated_at = now;
        let owner = post.user_id;
        let likes = post.likes.clone();

        if let Some(user) = state.users.get_mut(&actor) {
            if liked {
                user.liked_posts.push(post_id);
            } else {
                user.liked_posts.retain(|id| *id != post_id);
            }
            user.updated_at = now;
        }

        if liked {
            state
                .notifications
                .push(Notification::new(actor, owner, NotificationType::Like));
        }

        debug!(actor = %actor, post_id = %post_id, liked, "Like toggled");
        Ok(LikeToggle { liked, likes })
    }
}
