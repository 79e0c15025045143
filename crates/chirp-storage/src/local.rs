//! Local filesystem image host.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use chirp_core::config::ImageConfig;
use chirp_core::error::{AppError, ErrorKind};
use chirp_core::result::AppResult;
use chirp_core::traits::ImageHost;

use crate::payload::{self, ImageFormat};

/// Stores images as `{asset_id}.{ext}` under a root directory.
#[derive(Debug, Clone)]
pub struct LocalImageHost {
    /// Directory holding stored images.
    root: PathBuf,
    /// URL prefix the files are served under, without a trailing slash.
    public_base_url: String,
    /// Largest accepted decoded image.
    max_image_bytes: usize,
}

impl LocalImageHost {
    /// Create the host, creating the root directory if needed.
    pub async fn new(config: &ImageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create image root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_image_bytes: config.max_image_bytes,
        })
    }

    fn file_path(&self, asset_id: &str, format: ImageFormat) -> PathBuf {
        self.root.join(format!("{asset_id}.{}", format.extension()))
    }
}

/// Asset ids are generated UUIDs; anything else cannot name a stored file.
fn is_valid_asset_id(asset_id: &str) -> bool {
    !asset_id.is_empty()
        && asset_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[async_trait]
impl ImageHost for LocalImageHost {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    fn validate(&self, payload: &str) -> AppResult<()> {
        payload::decode(payload, self.max_image_bytes).map(|_| ())
    }

    async fn upload(&self, payload: &str) -> AppResult<String> {
        let image = payload::decode(payload, self.max_image_bytes)?;
        let asset_id = Uuid::new_v4().to_string();
        let path = self.file_path(&asset_id, image.format);

        fs::write(&path, &image.bytes).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write image: {}", path.display()),
                e,
            )
        })?;

        debug!(asset_id = %asset_id, bytes = image.bytes.len(), "Stored image");
        Ok(format!(
            "{}/{asset_id}.{}",
            self.public_base_url,
            image.format.extension()
        ))
    }

    async fn destroy(&self, asset_id: &str) -> AppResult<()> {
        if !is_valid_asset_id(asset_id) {
            debug!(asset_id, "Ignoring destroy for foreign asset id");
            return Ok(());
        }

        for format in ImageFormat::ALL {
            let path = self.file_path(asset_id, format);
            match fs::remove_file(&path).await {
                Ok(()) => debug!(asset_id, "Removed image"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to delete image: {}", path.display()),
                        e,
                    ));
                }
            }
        }
        Ok(())
    }
}
