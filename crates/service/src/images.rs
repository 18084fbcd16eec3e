//! Cover image intake: size cap and magic-byte sniffing.
//!
//! The stored MIME type always comes from the bytes, never from the client.

use crate::errors::ServiceError;

/// Uploads above this size are rejected before sniffing.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Placeholder MIME type some legacy rows carry; re-sniffed when served.
pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Classify by leading bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// An uploaded cover as received. `declared_type` is kept for logging only.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub declared_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>) -> Self { Self { bytes, declared_type: None } }
}

/// Size check first, then signature.
pub fn inspect(data: &[u8]) -> Result<ImageFormat, ServiceError> {
    if data.len() > MAX_IMAGE_BYTES {
        return Err(ServiceError::ImageTooLarge { size: data.len(), max: MAX_IMAGE_BYTES });
    }
    ImageFormat::sniff(data).ok_or(ServiceError::UnsupportedImageFormat)
}

/// MIME type to serve for a stored row.
pub fn served_mime_type(stored: &str, data: &[u8]) -> String {
    if stored == OCTET_STREAM {
        if let Some(fmt) = ImageFormat::sniff(data) {
            return fmt.mime_type().to_string();
        }
    }
    stored.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webp() -> Vec<u8> {
        let mut v = b"RIFF".to_vec();
        v.extend_from_slice(&[0x24, 0, 0, 0]);
        v.extend_from_slice(b"WEBPVP8 ");
        v
    }

    #[test]
    fn known_signatures() {
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"\x89PNG\r\n\x1a\n\0\0"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(b"GIF87a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(&webp()), Some(ImageFormat::Webp));
    }

    #[test]
    fn unknown_or_truncated_signatures() {
        assert_eq!(ImageFormat::sniff(b""), None);
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8]), None);
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WAVE"), None);
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0"), None);
        assert_eq!(ImageFormat::sniff(b"<svg xmlns="), None);
    }

    #[test]
    fn oversize_rejected_before_sniffing() {
        let mut big = vec![0u8; MAX_IMAGE_BYTES + 1];
        big[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
        assert!(matches!(inspect(&big), Err(ServiceError::ImageTooLarge { .. })));
    }

    #[test]
    fn exactly_max_size_is_accepted() {
        let mut data = vec![0u8; MAX_IMAGE_BYTES];
        data[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(inspect(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn small_unknown_payload_is_unsupported() {
        assert!(matches!(inspect(b"hello world"), Err(ServiceError::UnsupportedImageFormat)));
    }

    #[test]
    fn octet_stream_is_resniffed() {
        assert_eq!(served_mime_type(OCTET_STREAM, &[0xFF, 0xD8, 0xFF, 0x00]), "image/jpeg");
        assert_eq!(served_mime_type(OCTET_STREAM, b"junk"), OCTET_STREAM);
        assert_eq!(served_mime_type("image/png", &[0xFF, 0xD8, 0xFF]), "image/png");
    }
}
