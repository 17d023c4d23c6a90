/// Data URL and inline payload encoding
///
/// A data URL looks like `data:image/jpeg;base64,<payload>`. The preview
/// and the history keep the whole URL; the request only needs the MIME
/// type and the payload, so `encode_file` strips the prefix.
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageFormat;
use std::path::Path;

use crate::error::{Result, ScanError};

const FALLBACK_MIME: &str = "application/octet-stream";

/// One image ready to be inlined into a model request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    /// Base64 payload without the `data:...;base64,` prefix
    pub data: String,
}

/// Read a file and encode it for the request
pub async fn encode_file(path: &Path) -> Result<EncodedImage> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    encode_bytes(path, &bytes)
}

/// Encode already-loaded bytes. Goes through the data URL so the payload is
/// exactly what the preview shows.
pub fn encode_bytes(path: &Path, bytes: &[u8]) -> Result<EncodedImage> {
    let url = to_data_url(&mime_type_for(path, bytes), bytes);
    let (mime_type, data) = split_data_url(&url).ok_or(ScanError::InvalidDataUrl)?;
    Ok(EncodedImage {
        mime_type: mime_type.to_string(),
        data: data.to_string(),
    })
}

/// Sniff the content first, fall back to the extension
pub fn mime_type_for(path: &Path, bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    if let Ok(format) = ImageFormat::from_path(path) {
        return format.to_mime_type().to_string();
    }

    // The image crate has no HEIF support, but the model accepts it
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "heic" => "image/heic".to_string(),
        "heif" => "image/heif".to_string(),
        _ => FALLBACK_MIME.to_string(),
    }
}

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Split a base64 data URL into `(mime_type, payload)`
pub fn split_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime_type = meta.strip_suffix(";base64")?;
    Some((mime_type, payload))
}

/// Recover the raw bytes behind a data URL (history thumbnails)
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (_, payload) = split_data_url(url).ok_or(ScanError::InvalidDataUrl)?;
    STANDARD
        .decode(payload)
        .map_err(|_| ScanError::InvalidDataUrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Smallest valid PNG signature + IHDR start is enough for sniffing
    const PNG_HEADER: [u8; 16] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[test]
    fn test_mime_from_content_beats_extension() {
        // PNG bytes saved with a .jpg name
        let mime = mime_type_for(Path::new("car.jpg"), &PNG_HEADER);
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_type_for(Path::new("car.JPG"), b"not an image"), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("car.heic"), b"????"), "image/heic");
        assert_eq!(mime_type_for(Path::new("car"), b"????"), FALLBACK_MIME);
    }

    #[test]
    fn test_split_data_url() {
        assert_eq!(
            split_data_url("data:image/png;base64,AAAA"),
            Some(("image/png", "AAAA"))
        );
        assert_eq!(split_data_url("image/png;base64,AAAA"), None);
        assert_eq!(split_data_url("data:image/png,AAAA"), None);
        assert_eq!(split_data_url("data:image/png;base64"), None);
    }

    #[test]
    fn test_encode_strips_prefix() {
        let encoded = encode_bytes(Path::new("car.png"), &PNG_HEADER).unwrap();
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(encoded.data, STANDARD.encode(PNG_HEADER));
        assert!(!encoded.data.starts_with("data:"));
    }

    #[test]
    fn test_decode_data_url() {
        let url = to_data_url("image/png", &PNG_HEADER);
        assert_eq!(decode_data_url(&url).unwrap(), PNG_HEADER.to_vec());
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(ScanError::InvalidDataUrl)
        ));
    }

    #[tokio::test]
    async fn test_encode_file_is_deterministic() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&PNG_HEADER).unwrap();

        let first = encode_file(file.path()).await.unwrap();
        let second = encode_file(file.path()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_encode_missing_file() {
        let result = encode_file(Path::new("/nonexistent/car.jpg")).await;
        assert!(matches!(result, Err(ScanError::Read { .. })));
    }
}
