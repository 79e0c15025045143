//! Store traits consumed by the service layer, and the [`Stores`] bundle that
//! wires one backend into all of them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use chirp_core::config::{DatabaseConfig, DatabaseProvider};
use chirp_core::result::AppResult;
use chirp_entity::graph::{FollowAction, LikeToggle};
use chirp_entity::notification::NotificationView;
use chirp_entity::post::{Comment, CreatePost, Post};
use chirp_entity::user::{CreateUser, User};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    GraphRepository, NotificationRepository, PostRepository, UserRepository,
};

/// Persistence of identities and their profile fields.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Exact, case-sensitive handle lookup.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fetch every user whose id is in `ids`. Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;

    /// Insert a user. A taken handle or email yields `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Persist the profile fields of `user` (handle, name, email, password
    /// hash, bio, link, images). Social edge columns are not written.
    async fn update_profile(&self, user: &User) -> AppResult<User>;

    /// Up to `limit` random users other than `exclude`.
    async fn sample_excluding(&self, exclude: Uuid, limit: usize) -> AppResult<Vec<User>>;
}

/// Persistence of posts and their comments.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    async fn create(&self, data: &CreatePost) -> AppResult<Post>;

    /// Delete a post with its comments and drop it from every user's
    /// `liked_posts`, atomically.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Append a comment. A missing post yields `NotFound`.
    async fn add_comment(&self, comment: &Comment) -> AppResult<()>;

    /// Comments of the given posts in insertion order.
    async fn comments_for(&self, post_ids: &[Uuid]) -> AppResult<Vec<Comment>>;

    /// Every post, newest first.
    async fn list_all(&self) -> AppResult<Vec<Post>>;

    /// Posts owned by any of `author_ids`, newest first.
    async fn list_by_authors(&self, author_ids: &[Uuid]) -> AppResult<Vec<Post>>;

    /// Posts whose id is in `ids`, newest first.
    async fn list_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Post>>;
}

/// Per-recipient notification ledger.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Notifications addressed to `recipient`, newest first, with actors resolved.
    async fn list_for_recipient(&self, recipient: Uuid) -> AppResult<Vec<NotificationView>>;

    /// Flag every notification of `recipient` as read. Returns the number changed.
    async fn mark_all_read(&self, recipient: Uuid) -> AppResult<u64>;

    /// Remove every notification of `recipient`. Returns the number removed.
    async fn delete_for_recipient(&self, recipient: Uuid) -> AppResult<u64>;
}

/// Paired edge mutations. Each call is one atomic unit covering both records
/// and the notification it may emit.
#[async_trait]
pub trait GraphStore: Send + Sync + 'static {
    /// Flip the follow edge from `actor` to `target`. Adding the edge records
    /// a `follow` notification for `target`.
    async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> AppResult<FollowAction>;

    /// Flip `actor`'s like on `post_id`. Adding the like records a `like`
    /// notification for the post owner.
    async fn toggle_like(&self, actor: Uuid, post_id: Uuid) -> AppResult<LikeToggle>;
}

#[derive(Debug, Clone)]
enum Backend {
    Postgres(DatabasePool),
    Memory,
}

/// One backend exposed through every store trait.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub graph: Arc<dyn GraphStore>,
    backend: Backend,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &self.provider_type())
            .finish()
    }
}

impl Stores {
    /// Open the backend selected by `config.provider`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db))
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory store; data will not survive a restart");
                Ok(Self::memory(MemoryStore::new()))
            }
        }
    }

    /// Wire the PostgreSQL repositories over an open pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            posts: Arc::new(PostRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            graph: Arc::new(GraphRepository::new(pool)),
            backend: Backend::Postgres(db),
        }
    }

    /// Wire a shared in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            posts: store.clone(),
            notifications: store.clone(),
            graph: store,
            backend: Backend::Memory,
        }
    }

    pub fn provider_type(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }

    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.backend {
            Backend::Postgres(db) => db.health_check().await,
            Backend::Memory => Ok(true),
        }
    }

    pub async fn close(&self) {
        if let Backend::Postgres(db) = &self.backend {
            db.close().await;
        }
    }
}
