//! Post creation, deletion, comments and feeds.

pub mod feed;
pub mod service;

pub use service::PostService;
