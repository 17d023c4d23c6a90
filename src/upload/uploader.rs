/// Turns picked files into previewable images
use std::path::{Path, PathBuf};

use super::encoder;
use crate::error::{Result, ScanError};

/// One selected file, kept for the current session only
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub path: PathBuf,
    pub file_name: String,
    pub data_url: String,
}

impl UploadedImage {
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Self {
        let mime_type = encoder::mime_type_for(path, bytes);
        Self {
            path: path.to_path_buf(),
            file_name: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            data_url: encoder::to_data_url(&mime_type, bytes),
        }
    }
}

/// Read every picked file, in picker order.
///
/// Files that can't be read are logged and left out, so the returned list
/// is exactly what the request will contain.
pub async fn load_images(paths: Vec<PathBuf>) -> Vec<UploadedImage> {
    let mut images = Vec::with_capacity(paths.len());

    for path in paths {
        match read_image(&path).await {
            Ok(image) => images.push(image),
            Err(e) => tracing::warn!("⚠️  Skipping {}: {}", path.display(), e),
        }
    }

    tracing::info!("🖼️  Loaded {} image(s)", images.len());
    images
}

async fn read_image(path: &Path) -> Result<UploadedImage> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(UploadedImage::from_bytes(path, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_image(bytes: &[u8], suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_keeps_picker_order_and_skips_missing() {
        let first = temp_image(b"first", ".jpg");
        let second = temp_image(b"second", ".png");

        let images = load_images(vec![
            first.path().to_path_buf(),
            PathBuf::from("/nonexistent/missing.jpg"),
            second.path().to_path_buf(),
        ])
        .await;

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].path, first.path());
        assert_eq!(images[1].path, second.path());
        assert!(images[0].data_url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(
            encoder::decode_data_url(&images[1].data_url).unwrap(),
            b"second".to_vec()
        );
    }

    #[tokio::test]
    async fn test_load_nothing() {
        assert!(load_images(Vec::new()).await.is_empty());
    }

    #[test]
    fn test_preview_matches_request_payload() {
        let path = Path::new("truck.jpg");
        let uploaded = UploadedImage::from_bytes(path, b"jpeg-ish");
        let encoded = encoder::encode_bytes(path, b"jpeg-ish").unwrap();

        assert_eq!(uploaded.file_name, "truck.jpg");
        assert_eq!(
            uploaded.data_url,
            format!("data:{};base64,{}", encoded.mime_type, encoded.data)
        );
    }
}
