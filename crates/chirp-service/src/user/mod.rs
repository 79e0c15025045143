//! Profile lookup, follow suggestions and self-service profile updates.

pub mod service;

pub use service::{UpdateProfile, UserService};
