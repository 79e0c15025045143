//! Decoding of client-supplied image payloads.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use chirp_core::error::AppError;
use chirp_core::result::AppResult;

/// Image formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Every accepted format.
    pub const ALL: [ImageFormat; 4] = [Self::Png, Self::Jpeg, Self::Gif, Self::Webp];

    /// File extension used on disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detect the format from the leading magic bytes.
    fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }
}

/// A decoded image ready to be stored.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Decode a `data:image/<type>;base64,<data>` URL or bare base64 data.
///
/// A declared MIME type wins; bare data is identified by its magic bytes.
pub fn decode(payload: &str, max_bytes: usize) -> AppResult<DecodedImage> {
    let payload = payload.trim();
    let (declared, data) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| AppError::validation("Malformed image data URL"))?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| AppError::validation("Image data must be base64 encoded"))?;
            let format = ImageFormat::from_mime(mime)
                .ok_or_else(|| AppError::validation(format!("Unsupported image type: {mime}")))?;
            (Some(format), data)
        }
        None => (None, payload),
    };

    // Rough pre-check so oversized payloads are rejected before decoding.
    if data.len() / 4 * 3 > max_bytes + 3 {
        return Err(AppError::validation("Image is too large"));
    }

    let bytes = STANDARD
        .decode(data)
        .map_err(|_| AppError::validation("Image data is not valid base64"))?;
    if bytes.is_empty() {
        return Err(AppError::validation("Image data is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(AppError::validation("Image is too large"));
    }

    let format = declared
        .or_else(|| ImageFormat::sniff(&bytes))
        .ok_or_else(|| AppError::validation("Unsupported image type"))?;

    Ok(DecodedImage { format, bytes })
}
