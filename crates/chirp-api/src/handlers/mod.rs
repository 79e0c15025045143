//! Request handlers, one module per API area.

pub mod auth;
pub mod health;
pub mod notification;
pub mod post;
pub mod user;
