use iced::widget::{button, column, horizontal_space, row, text, Row};
use iced::{Alignment, Element, Length, Theme};

use crate::config::ThemeChoice;
use crate::net::decode::FetchedImage;
use crate::state::controller::GalleryController;
use crate::Message;

type ButtonStyle = fn(&Theme, button::Status) -> button::Style;

/// Category navigation (All, sizes, and the styles of the selected size)
/// plus the theme toggle
pub fn view(gallery: Option<&GalleryController<FetchedImage>>, theme: ThemeChoice) -> Element<'_, Message> {
    let toggle_label = match theme {
        ThemeChoice::Light => "Dark mode",
        ThemeChoice::Dark => "Light mode",
    };
    let toggle = button(text(toggle_label).size(14))
        .on_press(Message::ToggleTheme)
        .style(button::text);

    let Some(gallery) = gallery else {
        return row![horizontal_space(), toggle].padding(10).into();
    };

    let router = gallery.router();
    let selected_size = router.selected_size();

    let mut main_nav = Row::new()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(category_button("All", selected_size.is_none(), Message::ShowAll));

    for size in router.sizes() {
        main_nav = main_nav.push(category_button(
            size,
            selected_size == Some(size.as_str()),
            Message::SelectSize(size.clone()),
        ));
    }

    let main_nav = main_nav.push(horizontal_space()).push(toggle);

    if router.styles().is_empty() {
        return main_nav.padding(10).into();
    }

    let styles = router.styles().iter().fold(Row::new().spacing(8), |styles, style| {
        styles.push(category_button(
            style,
            router.selected_style() == Some(style.as_str()),
            Message::SelectStyle(style.clone()),
        ))
    });

    column![main_nav, styles]
        .spacing(10)
        .padding(10)
        .width(Length::Fill)
        .into()
}

fn category_button(label: &str, active: bool, on_press: Message) -> Element<'_, Message> {
    let style: ButtonStyle = if active {
        button::primary
    } else {
        button::secondary
    };

    button(text(label).size(14))
        .on_press(on_press)
        .style(style)
        .padding([6, 14])
        .into()
}
