//! Image host trait for pluggable image storage backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for services that store user-supplied images and serve them by URL.
///
/// Uploaded images are addressed by an *asset id*: the last path segment of
/// the public URL with its extension removed. Callers only ever keep the URL;
/// [`asset_id_from_url`] recovers the id when an image must be released.
#[async_trait]
pub trait ImageHost: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the host is reachable and writable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Check that a payload would be accepted by [`ImageHost::upload`]
    /// without storing anything.
    fn validate(&self, payload: &str) -> AppResult<()>;

    /// Store an image payload (a `data:image/...;base64,` URL or bare base64)
    /// and return the public URL of the stored image.
    async fn upload(&self, payload: &str) -> AppResult<String>;

    /// Release the image with the given asset id.
    ///
    /// Destroying an asset that does not exist is not an error.
    async fn destroy(&self, asset_id: &str) -> AppResult<()>;

    /// Release the image behind a previously returned URL.
    async fn destroy_url(&self, url: &str) -> AppResult<()> {
        match asset_id_from_url(url) {
            Some(asset_id) => self.destroy(asset_id).await,
            None => Ok(()),
        }
    }
}

/// Derive an asset id from a hosted image URL.
///
/// `https://host/uploads/abc123.png` yields `abc123`.
pub fn asset_id_from_url(url: &str) -> Option<&str> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query.rsplit('/').next()?;
    let id = segment.split('.').next()?;
    if id.is_empty() { None } else { Some(id) }
}
