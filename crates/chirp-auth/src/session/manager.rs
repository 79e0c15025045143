//! Session lifecycle: signup, login, and per-request token verification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use chirp_core::config::AuthConfig;
use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_database::UserStore;
use chirp_entity::user::{CreateUser, User};

use crate::email::is_valid_email;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};

/// Input to [`SessionManager::signup`].
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// A verified identity together with its freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// The identity, password hash removed.
    pub user: User,
    /// Signed session token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Converts credentials into session tokens and tokens back into identities.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: Arc<PasswordHasher>,
    validator: PasswordValidator,
    /// Verified against when the handle is unknown so both login failures cost the same.
    dummy_hash: String,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("validator", &self.validator)
            .finish()
    }
}

impl SessionManager {
    pub fn new(users: Arc<dyn UserStore>, config: &AuthConfig) -> AppResult<Self> {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash_password("chirp-dummy-password")?;
        Ok(Self {
            users,
            encoder: Arc::new(JwtEncoder::new(config)?),
            decoder: Arc::new(JwtDecoder::new(config)),
            hasher: Arc::new(hasher),
            validator: PasswordValidator::new(config),
            dummy_hash,
        })
    }

    /// Register a new identity and log it in.
    ///
    /// Checks run in order and the first failure wins:
    /// 1. email format
    /// 2. handle not taken
    /// 3. email not taken
    /// 4. password length
    pub async fn signup(&self, data: &NewIdentity) -> AppResult<IssuedSession> {
        if !is_valid_email(&data.email) {
            return Err(AppError::validation("Invalid email format"));
        }
        if self.users.find_by_username(&data.username).await?.is_some() {
            return Err(AppError::conflict("Username is already taken"));
        }
        if self.users.find_by_email(&data.email).await?.is_some() {
            return Err(AppError::conflict("Email is already taken"));
        }
        self.validator.validate(&data.password)?;

        let password_hash = self.hasher.hash_password(&data.password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: data.username.clone(),
                full_name: data.full_name.clone(),
                email: data.email.clone(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User signed up");
        self.issue(user)
    }

    /// Verify a handle/password pair and issue a session.
    ///
    /// Unknown handle and wrong password produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedSession> {
        let user = self.users.find_by_username(username).await?;
        let hash = user
            .as_ref()
            .map_or(self.dummy_hash.as_str(), |u| u.password_hash.as_str());
        let password_valid = self.hasher.verify_password(password, hash)?;

        match user {
            Some(user) if password_valid => {
                info!(user_id = %user.id, "User logged in");
                self.issue(user)
            }
            _ => {
                warn!(username, "Failed login attempt");
                Err(AppError::invalid_credentials())
            }
        }
    }

    /// Resolve the cookie-borne token of a request to an identity.
    pub async fn authenticate(&self, token: Option<&str>) -> AppResult<User> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Unauthorized: No Token Provided"))?;
        let claims = self.decoder.decode(token)?;

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::identity_not_found("User not found"))?;
        Ok(user.redacted())
    }

    /// Sign a session token for `user`.
    pub fn issue(&self, user: User) -> AppResult<IssuedSession> {
        let (token, expires_at) = self.encoder.issue(user.id)?;
        Ok(IssuedSession {
            user: user.redacted(),
            token,
            expires_at,
        })
    }

    /// Check `password` against the stored hash of `user`.
    pub fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        self.hasher.verify_password(password, &user.password_hash)
    }

    /// Apply the password policy to `password` and hash it.
    pub fn hash_new_password(&self, password: &str) -> AppResult<String> {
        self.validator.validate(password)?;
        self.hasher.hash_password(password)
    }

    pub fn encoder(&self) -> &JwtEncoder {
        &self.encoder
    }
}

#[cfg(test)]
mod tests {
    use chirp_core::ErrorKind;
    use chirp_database::MemoryStore;

    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemoryStore::new()), &AuthConfig::default()).unwrap()
    }

    fn alice() -> NewIdentity {
        NewIdentity {
            username: "alice".into(),
            full_name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn test_signup_stores_hash_and_returns_redacted_user() {
        let manager = manager();
        let session = manager.signup(&alice()).await.unwrap();

        assert!(session.user.password_hash.is_empty());
        let stored = manager
            .users
            .find_by_id(session.user.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_signup_check_order() {
        let manager = manager();
        manager.signup(&alice()).await.unwrap();

        // Bad email wins over a taken handle.
        let err = manager
            .signup(&NewIdentity {
                email: "nope".into(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid email format");

        // Taken handle wins over taken email and a short password.
        let err = manager
            .signup(&NewIdentity {
                password: "123".into(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Username is already taken");

        let err = manager
            .signup(&NewIdentity {
                username: "alice2".into(),
                password: "123".into(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Email is already taken");

        let err = manager
            .signup(&NewIdentity {
                username: "alice2".into(),
                email: "alice2@example.com".into(),
                password: "123".into(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let manager = manager();
        manager.signup(&alice()).await.unwrap();

        let unknown = manager.login("bob", "secret1").await.unwrap_err();
        let wrong = manager.login("alice", "wrong-password").await.unwrap_err();
        assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
        assert_eq!(unknown.kind, wrong.kind);
        assert_eq!(unknown.message, wrong.message);

        let ok = manager.login("alice", "secret1").await.unwrap();
        assert_eq!(ok.user.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_outcomes() {
        let manager = manager();
        let session = manager.signup(&alice()).await.unwrap();

        let user = manager.authenticate(Some(&session.token)).await.unwrap();
        assert_eq!(user.id, session.user.id);
        assert!(user.password_hash.is_empty());

        let err = manager.authenticate(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);

        let err = manager.authenticate(Some("garbage")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);

        let (orphan, _) = manager.encoder().issue(uuid::Uuid::new_v4()).unwrap();
        let err = manager.authenticate(Some(&orphan)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::IdentityNotFound);
    }
}
