/// Errors surfaced by the scanner
///
/// Library code returns `Result<T, ScanError>`; the UI layer turns these
/// into display strings when they cross into a `Message`.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Process was pressed with an empty selection
    #[error("No image uploaded")]
    NoImages,

    #[error("No API key configured. Set GEMINI_API_KEY or add api_key to config.toml")]
    MissingApiKey,

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the user data directory")]
    NoDataDir,

    #[error("Not a base64 data URL")]
    InvalidDataUrl,

    #[error("Request to the vision model failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vision model returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response blocked by the model: {0}")]
    Blocked(String),

    #[error("Vision model returned no text")]
    EmptyResponse,

    #[error("History storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_images_message_is_fixed() {
        assert_eq!(ScanError::NoImages.to_string(), "No image uploaded");
    }

    #[test]
    fn test_api_error_includes_status() {
        let err = ScanError::Api {
            status: 429,
            body: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "Vision model returned HTTP 429: quota");
    }
}
