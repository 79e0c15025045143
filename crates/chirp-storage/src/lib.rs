//! # chirp-storage
//!
//! Image hosting for post, avatar and cover images. Implements
//! [`chirp_core::traits::ImageHost`] on the local filesystem; stored files are
//! served back by the API under the configured public URL prefix.

pub mod local;
pub mod payload;

pub use local::LocalImageHost;
pub use payload::{DecodedImage, ImageFormat};
