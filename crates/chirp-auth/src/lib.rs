//! # chirp-auth
//!
//! Authentication for Chirp.
//!
//! ## Modules
//!
//! - `jwt`: session token claims, signing and verification
//! - `password`: Argon2id password hashing and length policy
//! - `session`: signup, login and per-request token verification

pub mod email;
pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{IssuedSession, NewIdentity, SessionManager};
