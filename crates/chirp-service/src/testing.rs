//! Shared fixture for service tests: every service wired over one in-memory
//! store and a temporary local image host.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use chirp_auth::{NewIdentity, SessionManager};
use chirp_core::config::{AuthConfig, ImageConfig};
use chirp_database::{MemoryStore, Stores};
use chirp_entity::user::User;
use chirp_storage::LocalImageHost;

use crate::context::RequestContext;
use crate::{NotificationService, PostService, SocialGraphService, UserService};

pub(crate) struct Harness {
    pub stores: Stores,
    pub sessions: Arc<SessionManager>,
    pub users: UserService,
    pub posts: PostService,
    pub social: SocialGraphService,
    pub notifications: NotificationService,
    images_dir: tempfile::TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let images_dir = tempfile::tempdir().unwrap();
        let images = Arc::new(
            LocalImageHost::new(&ImageConfig {
                root_path: images_dir.path().to_str().unwrap().to_string(),
                ..ImageConfig::default()
            })
            .await
            .unwrap(),
        );
        let stores = Stores::memory(MemoryStore::new());
        let sessions =
            Arc::new(SessionManager::new(stores.users.clone(), &AuthConfig::default()).unwrap());

        Self {
            users: UserService::new(stores.users.clone(), sessions.clone(), images.clone()),
            posts: PostService::new(stores.posts.clone(), stores.users.clone(), images),
            social: SocialGraphService::new(stores.graph.clone()),
            notifications: NotificationService::new(stores.notifications.clone()),
            sessions,
            stores,
            images_dir,
        }
    }

    /// Sign up `name` with email `{name}@example.com` and password `secret1`.
    pub async fn signup(&self, name: &str) -> User {
        self.sessions
            .signup(&NewIdentity {
                username: name.to_string(),
                full_name: name.to_uppercase(),
                email: format!("{name}@example.com"),
                password: "secret1".to_string(),
            })
            .await
            .unwrap()
            .user
    }

    /// A context holding the current stored state of `user`.
    pub async fn ctx(&self, user: &User) -> RequestContext {
        let fresh = self.stores.users.find_by_id(user.id).await.unwrap().unwrap();
        RequestContext::new(fresh)
    }

    pub fn image_exists(&self, url: &str) -> bool {
        let file_name = url.rsplit('/').next().unwrap();
        self.images_dir.path().join(file_name).exists()
    }

    /// Number of files currently held by the image host.
    pub fn stored_image_count(&self) -> usize {
        std::fs::read_dir(self.images_dir.path()).unwrap().count()
    }
}

pub(crate) fn png_payload() -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode(b"\x89PNG\r\n\x1a\nimage-bytes")
    )
}
