//! # chirp-service
//!
//! Business logic for Chirp. Each service is built from `Arc` handles to the
//! store traits (and the image host where images are involved) and takes a
//! [`RequestContext`] identifying the caller.

pub mod context;
pub mod notification;
pub mod post;
pub mod social;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use notification::NotificationService;
pub use post::PostService;
pub use social::SocialGraphService;
pub use user::{UpdateProfile, UserService};
