/// View helpers
///
/// - Preview grid of the current selection (preview.rs)
/// - History table (history.rs)
/// - Click-to-close image overlay (modal.rs)

pub mod history;
pub mod modal;
pub mod preview;

use iced::widget::image::Handle;

use crate::upload::encoder;

/// Image handle for a stored data URL, `None` if it can't be decoded
pub fn handle_for(data_url: &str) -> Option<Handle> {
    match encoder::decode_data_url(data_url) {
        Ok(bytes) => Some(Handle::from_bytes(bytes)),
        Err(e) => {
            tracing::warn!("⚠️  Cannot show stored image: {}", e);
            None
        }
    }
}
