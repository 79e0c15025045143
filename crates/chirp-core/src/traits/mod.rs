//! Core traits defined in `chirp-core` and implemented by other crates.

pub mod image_host;

pub use image_host::{ImageHost, asset_id_from_url};
