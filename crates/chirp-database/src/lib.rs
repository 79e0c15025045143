//! # chirp-database
//!
//! Persistence for Chirp. The service layer talks to the store traits in
//! [`store`]; two backends implement them:
//!
//! - [`repositories`]: PostgreSQL via sqlx, with migrations under `migrations/`
//! - [`memory`]: a single-mutex in-memory store for development and tests

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{GraphStore, NotificationStore, PostStore, Stores, UserStore};
