//! Request context carrying the authenticated user.

use uuid::Uuid;

use chirp_entity::user::User;

/// Context for the current authenticated request.
///
/// Built by the API layer once the session token has been verified and passed
/// into every service method, so each operation knows who is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user as loaded for this request, password hash removed.
    pub user: User,
}

impl RequestContext {
    pub fn new(user: User) -> Self {
        Self {
            user: user.redacted(),
        }
    }

    /// The caller's user ID.
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}
