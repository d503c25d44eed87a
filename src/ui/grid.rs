use iced::widget::{column, container, mouse_area, scrollable, text, Column, Row};
use iced::{Element, Length};

use crate::net::decode::FetchedImage;
use crate::state::controller::GalleryController;
use crate::state::layout::IMAGE_GAP;
use crate::Message;

/// Id of the scrollable holding the columns
pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("gallery-grid")
}

/// Masonry columns inside a scrollable, with the loading line underneath
pub fn view(gallery: &GalleryController<FetchedImage>) -> Element<'_, Message> {
    let columns = gallery.layout().columns().iter().map(|bucket| {
        let tiles = bucket.items().iter().filter_map(|placed| {
            let image = gallery.loaded(placed.index)?;
            Some(Element::from(
                mouse_area(iced::widget::image(image.handle.clone()).width(Length::Fill))
                    .on_press(Message::OpenImage(placed.index)),
            ))
        });

        Element::from(
            Column::with_children(tiles)
                .spacing(IMAGE_GAP)
                .width(Length::FillPortion(1)),
        )
    });

    let mut content = column![Row::with_children(columns)
        .spacing(IMAGE_GAP)
        .padding(IMAGE_GAP)];

    if gallery.is_loading() {
        content = content.push(
            container(text("Loading...").size(14))
                .center_x(Length::Fill)
                .padding(20),
        );
    }

    scrollable(content)
        .id(grid_id())
        .on_scroll(Message::Scrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Inline message replacing the gallery when the catalog failed to load
pub fn error_message(message: &str) -> Element<'_, Message> {
    container(text(message).size(18))
        .center(Length::Fill)
        .padding(40)
        .into()
}
