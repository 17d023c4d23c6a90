/// Thumbnails of the current selection
use iced::widget::image::Handle;
use iced::widget::{column, container, image, text};
use iced::{Element, Length};
use iced_aw::Wrap;

use crate::upload::UploadedImage;
use crate::Message;

const PREVIEW_WIDTH: f32 = 180.0;

/// Wrapping grid, one tile per uploaded image. `handles` is index-aligned
/// with `images`; a `None` handle shows the file name only.
pub fn grid<'a>(images: &'a [UploadedImage], handles: &'a [Option<Handle>]) -> Element<'a, Message> {
    if images.is_empty() {
        return text("No images selected").size(14).into();
    }

    let tiles: Vec<Element<'a, Message>> = images
        .iter()
        .zip(handles)
        .map(|(uploaded, handle)| {
            let picture: Element<'a, Message> = match handle {
                Some(handle) => image(handle.clone()).width(Length::Fixed(PREVIEW_WIDTH)).into(),
                None => text("(preview unavailable)").size(12).into(),
            };

            container(column![picture, text(&uploaded.file_name).size(12)].spacing(4))
                .padding(4)
                .into()
        })
        .collect();

    Wrap::with_elements(tiles)
        .spacing(10.0)
        .line_spacing(10.0)
        .into()
}
