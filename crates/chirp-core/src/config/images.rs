//! Image hosting configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the image host that stores post, avatar and cover images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Directory where uploaded images are written.
    #[serde(default = "default_root")]
    pub root_path: String,
    /// URL prefix under which stored images are served.
    #[serde(default = "default_public_base")]
    pub public_base_url: String,
    /// Largest accepted decoded image in bytes.
    #[serde(default = "default_max_image")]
    pub max_image_bytes: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root(),
            public_base_url: default_public_base(),
            max_image_bytes: default_max_image(),
        }
    }
}

fn default_root() -> String {
    "./data/uploads".to_string()
}

fn default_public_base() -> String {
    "/uploads".to_string()
}

fn default_max_image() -> usize {
    4 * 1024 * 1024
}
