//! PostgreSQL implementations of the store traits.

pub mod graph;
pub mod notification;
pub mod post;
pub mod user;

pub use graph::GraphRepository;
pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use user::UserRepository;
