use iced::widget::{button, column, container, horizontal_space, mouse_area, row, text, Space};
use iced::{Alignment, Background, Color, ContentFit, Element, Length, Theme};

use crate::net::decode::FetchedImage;
use crate::state::controller::{GalleryController, CAPTION_SOURCE};
use crate::Message;

/// Width reserved for a hidden prev/next button so the image doesn't jump
const NAV_BUTTON_WIDTH: f32 = 56.0;

/// Full-screen overlay for the open image, or `None` while closed
pub fn view(gallery: &GalleryController<FetchedImage>) -> Option<Element<'_, Message>> {
    let controls = gallery.nav_controls()?;
    let caption = gallery.caption().unwrap_or_default();

    let picture: Element<Message> = match gallery.modal_image() {
        Some(image) => iced::widget::image(image.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => container(text("Loading...").color(Color::WHITE))
            .center(Length::Fill)
            .into(),
    };

    let prev = nav_button("‹", controls.show_prev.then_some(Message::PrevImage));
    let next = nav_button("›", controls.show_next.then_some(Message::NextImage));

    let close = button(text("×").size(32).color(Color::WHITE))
        .on_press(Message::CloseModal)
        .style(button::text);

    // clicks on the picture itself must not reach the backdrop
    let stage = row![prev, mouse_area(picture).on_press(Message::Noop), next]
        .align_y(Alignment::Center)
        .height(Length::Fill);

    let captions = column![
        text(caption).size(16).color(Color::WHITE),
        text(CAPTION_SOURCE)
            .size(13)
            .color(Color::from_rgb(0.6, 0.6, 0.6)),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .width(Length::Fill);

    let body = column![row![horizontal_space(), close], stage, captions]
        .spacing(10)
        .padding(20);

    let backdrop = container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.9))),
            ..container::Style::default()
        });

    Some(mouse_area(backdrop).on_press(Message::CloseModal).into())
}

fn nav_button(label: &str, on_press: Option<Message>) -> Element<'_, Message> {
    match on_press {
        Some(message) => button(text(label).size(40).color(Color::WHITE))
            .on_press(message)
            .style(button::text)
            .width(Length::Fixed(NAV_BUTTON_WIDTH))
            .into(),
        None => Space::with_width(Length::Fixed(NAV_BUTTON_WIDTH)).into(),
    }
}
