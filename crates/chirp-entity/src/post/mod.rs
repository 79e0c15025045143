//! Post and comment domain entities.

pub mod comment;
pub mod model;
pub mod view;

pub use comment::Comment;
pub use model::{CreatePost, Post};
pub use view::{CommentView, PostView};
