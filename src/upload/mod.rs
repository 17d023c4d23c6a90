/// Image upload module
///
/// This module handles:
/// - Reading picked files into previewable data URLs (uploader.rs)
/// - Encoding files into inline request payloads (encoder.rs)

pub mod encoder;
pub mod uploader;

pub use encoder::EncodedImage;
pub use uploader::UploadedImage;
