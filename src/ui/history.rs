/// History table: thumbnail, result, time
use iced::widget::image::Handle;
use iced::widget::{column, container, horizontal_rule, image, mouse_area, row, text, Column};
use iced::{Alignment, Element, Length};

use crate::state::data::AnalysisRecord;
use crate::Message;

const THUMB_WIDTH: f32 = 120.0;

pub fn table<'a>(records: &'a [AnalysisRecord], thumbs: &'a [Option<Handle>]) -> Element<'a, Message> {
    if records.is_empty() {
        return text("No past analyses").size(14).into();
    }

    let header = row![
        text("Image").size(14).width(Length::Fixed(THUMB_WIDTH)),
        text("Result").size(14).width(Length::Fill),
        text("Analysed").size(14).width(Length::Fixed(140.0)),
    ]
    .spacing(16);

    let mut rows: Column<'a, Message> = column![header, horizontal_rule(1)].spacing(8);

    for (index, (record, thumb)) in records.iter().zip(thumbs).enumerate() {
        let picture: Element<'a, Message> = match thumb {
            // Clicking the thumbnail opens it full size
            Some(handle) => mouse_area(image(handle.clone()).width(Length::Fixed(THUMB_WIDTH)))
                .on_press(Message::OpenImage(index))
                .into(),
            None => text("?").width(Length::Fixed(THUMB_WIDTH)).into(),
        };

        let when = record
            .analysed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        rows = rows.push(
            row![
                picture,
                container(text(&record.result).size(14)).width(Length::Fill),
                text(when).size(12).width(Length::Fixed(140.0)),
            ]
            .spacing(16)
            .align_y(Alignment::Start),
        );
    }

    rows.into()
}
