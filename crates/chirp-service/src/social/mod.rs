//! Follow and like toggles.

pub mod service;

pub use service::SocialGraphService;
