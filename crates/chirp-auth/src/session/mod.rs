//! Signup, login and session verification.

pub mod manager;

pub use manager::{IssuedSession, NewIdentity, SessionManager};
