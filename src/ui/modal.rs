/// Full-size overlay for a history image
use iced::widget::image::Handle;
use iced::widget::{container, image, mouse_area, opaque, stack};
use iced::{Color, ContentFit, Element, Length, Theme};

use crate::Message;

/// Draw `handle` over `base`. A click anywhere on the overlay closes it.
pub fn overlay<'a>(base: Element<'a, Message>, handle: Handle) -> Element<'a, Message> {
    let enlarged = container(image(handle).content_fit(ContentFit::Contain))
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(
                Color {
                    a: 0.85,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        });

    stack![base, opaque(mouse_area(enlarged).on_press(Message::CloseImage))].into()
}
