/// Vehicle analysis
///
/// This module handles:
/// - The fixed prompt (prompt.rs)
/// - The Gemini HTTP client (gemini.rs)
/// - Turning a selection of files into exactly one model request (this file)
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, ScanError};
use crate::upload::{encoder, EncodedImage};

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;

/// One prompt plus the images it refers to
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub prompt: String,
    pub images: Vec<EncodedImage>,
}

/// A text + image in, text out model
#[async_trait]
pub trait VisionModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: VisionRequest) -> Result<String>;
}

pub struct Analyzer {
    model: Arc<dyn VisionModel>,
    prompt: String,
}

impl Analyzer {
    pub fn new(model: Arc<dyn VisionModel>, damage_assessment: bool) -> Self {
        Self {
            model,
            prompt: prompt::build(damage_assessment),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Encode every selected file and send one request.
    ///
    /// Returns `ScanError::NoImages` before touching the model when the
    /// selection is empty.
    pub async fn analyze(&self, files: &[PathBuf]) -> Result<String> {
        if files.is_empty() {
            return Err(ScanError::NoImages);
        }

        let mut images = Vec::with_capacity(files.len());
        for path in files {
            images.push(encoder::encode_file(path).await?);
        }

        let request = VisionRequest {
            prompt: self.prompt.clone(),
            images,
        };

        let text = self.model.generate(request).await?;
        tracing::info!("✅ {} returned {} chars", self.model.name(), text.len());
        Ok(text)
    }
}
