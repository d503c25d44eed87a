use iced::keyboard::{self, key::Named, Key};
use iced::widget::{column, container, scrollable, stack, text};
use iced::{window, Element, Length, Subscription, Task, Theme};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod net;
mod state;
mod ui;

use config::{AppConfig, Settings};
use error::GalleryError;
use net::client::{HttpClient, RemoteConfig};
use net::decode::FetchedImage;
use net::source;
use state::controller::{
    BatchRequest, FullImageOutcome, FullImageRequest, GalleryController, NavEffects,
    ThumbnailOutcome,
};
use state::data::ImageRecord;
use state::navigator::ModalKey;

/// Where the gallery is in its startup sequence
enum Phase {
    /// Waiting for `/config` and `/images`
    Connecting,
    /// `/config` failed; nothing more will happen
    Unavailable,
    /// `/images` failed; the message replaces the gallery
    Failed(String),
    Ready(GalleryController<FetchedImage>),
}

/// Main application state
struct Gallery {
    config: AppConfig,
    settings: Settings,
    client: HttpClient,
    phase: Phase,
    /// Last known window width
    viewport_width: f32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    ConfigLoaded(Result<RemoteConfig, GalleryError>),
    CatalogLoaded(Result<Vec<ImageRecord>, GalleryError>),
    Resized(f32),
    Scrolled(scrollable::Viewport),
    /// The throttle interval after a refused scroll check has passed
    ScrollSettled,
    ThumbnailLoaded(ThumbnailOutcome<FetchedImage>),
    FullImageLoaded(FullImageOutcome<FetchedImage>),
    ShowAll,
    SelectSize(String),
    SelectStyle(String),
    OpenImage(usize),
    NextImage,
    PrevImage,
    CloseModal,
    Key(ModalKey),
    ToggleTheme,
    /// Swallows clicks that must not reach the layer below
    Noop,
}

impl Gallery {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        let settings = config
            .settings_path
            .as_deref()
            .map(Settings::load)
            .unwrap_or_default();
        let client = HttpClient::new(config.server_url.clone());

        info!("🎨 Gallery starting against {}", config.server_url);

        let startup = Task::batch([
            Task::perform(client.clone().fetch_config(), Message::ConfigLoaded),
            window::get_oldest()
                .and_then(window::get_size)
                .map(|size| Message::Resized(size.width)),
        ]);

        let viewport_width = config.initial_width;
        (
            Gallery {
                config,
                settings,
                client,
                phase: Phase::Connecting,
                viewport_width,
            },
            startup,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ConfigLoaded(Ok(remote)) => {
                match self.client.clone().with_image_base(&remote.image_base_url) {
                    Ok(client) => {
                        self.client = client;
                        Task::perform(self.client.clone().fetch_catalog(), Message::CatalogLoaded)
                    }
                    Err(err) => {
                        error!("❌ {}", err);
                        self.phase = Phase::Unavailable;
                        Task::none()
                    }
                }
            }
            Message::ConfigLoaded(Err(err)) => {
                error!("❌ {}", err);
                self.phase = Phase::Unavailable;
                Task::none()
            }
            Message::CatalogLoaded(Ok(records)) => {
                let mut gallery = GalleryController::new(
                    records,
                    self.config.category_mode.strategy(),
                    self.viewport_width,
                );
                let batch = gallery.load_next_batch();
                self.phase = Phase::Ready(gallery);
                self.run_batch(batch)
            }
            Message::CatalogLoaded(Err(err)) => {
                error!("❌ {}", err);
                self.phase = Phase::Failed(err.to_string());
                Task::none()
            }
            Message::Resized(width) => {
                self.viewport_width = width;
                let Phase::Ready(gallery) = &mut self.phase else {
                    return Task::none();
                };
                let batch = gallery.resize(width);
                self.run_batch(batch)
            }
            Message::Scrolled(viewport) => {
                let Phase::Ready(gallery) = &mut self.phase else {
                    return Task::none();
                };
                let distance = viewport.content_bounds().height
                    - viewport.absolute_offset().y
                    - viewport.bounds().height;

                let was_waiting = gallery.has_trailing_scroll();
                let batch = gallery.on_scroll(distance, Instant::now());
                let settle = if gallery.has_trailing_scroll() && !was_waiting {
                    settle_after(gallery.scroll_interval())
                } else {
                    Task::none()
                };
                Task::batch([self.run_batch(batch), settle])
            }
            Message::ScrollSettled => {
                let Phase::Ready(gallery) = &mut self.phase else {
                    return Task::none();
                };
                let batch = gallery.settle_scroll(Instant::now());
                let settle = if gallery.has_trailing_scroll() {
                    settle_after(gallery.scroll_interval())
                } else {
                    Task::none()
                };
                Task::batch([self.run_batch(batch), settle])
            }
            Message::ThumbnailLoaded(outcome) => {
                if let Phase::Ready(gallery) = &mut self.phase {
                    gallery.apply_thumbnail(outcome);
                }
                Task::none()
            }
            Message::FullImageLoaded(outcome) => {
                if let Phase::Ready(gallery) = &mut self.phase {
                    gallery.apply_full_image(outcome);
                }
                Task::none()
            }
            Message::ShowAll => self.change_category(|gallery| gallery.select_all()),
            Message::SelectSize(size) => {
                if let Phase::Ready(gallery) = &mut self.phase {
                    gallery.select_size(&size);
                }
                Task::none()
            }
            Message::SelectStyle(style) => {
                self.change_category(|gallery| gallery.select_style(&style))
            }
            Message::OpenImage(index) => {
                let Phase::Ready(gallery) = &mut self.phase else {
                    return Task::none();
                };
                let request = gallery.open(index);
                self.run_full_image(request)
            }
            Message::NextImage => self.navigate(|gallery| gallery.next()),
            Message::PrevImage => self.navigate(|gallery| NavEffects {
                batch: None,
                full_image: gallery.prev(),
            }),
            Message::CloseModal => {
                if let Phase::Ready(gallery) = &mut self.phase {
                    gallery.close();
                }
                Task::none()
            }
            Message::Key(key) => self.navigate(|gallery| gallery.handle_key(key)),
            Message::ToggleTheme => {
                self.settings.theme = self.settings.theme.toggled();
                if let Some(path) = &self.config.settings_path {
                    if let Err(err) = self.settings.save(path) {
                        warn!("⚠️  {}", err);
                    }
                }
                Task::none()
            }
            Message::Noop => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = ui::header::view(self.controller(), self.settings.theme);

        let body: Element<Message> = match &self.phase {
            Phase::Connecting => container(text("Loading...").size(16))
                .center(Length::Fill)
                .into(),
            Phase::Unavailable => container(text("Gallery unavailable").size(16))
                .center(Length::Fill)
                .into(),
            Phase::Failed(message) => ui::grid::error_message(message),
            Phase::Ready(gallery) => ui::grid::view(gallery),
        };

        let page = column![header, body].height(Length::Fill);

        match self.controller().and_then(ui::modal::view) {
            Some(overlay) => stack![page, overlay].into(),
            None => page.into(),
        }
    }

    fn theme(&self) -> Theme {
        match self.settings.theme {
            config::ThemeChoice::Light => Theme::Light,
            config::ThemeChoice::Dark => Theme::Dark,
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            keyboard::on_key_press(modal_key),
            window::resize_events().map(|(_id, size)| Message::Resized(size.width)),
        ])
    }

    fn controller(&self) -> Option<&GalleryController<FetchedImage>> {
        match &self.phase {
            Phase::Ready(gallery) => Some(gallery),
            _ => None,
        }
    }

    fn change_category(
        &mut self,
        select: impl FnOnce(&mut GalleryController<FetchedImage>) -> Option<BatchRequest>,
    ) -> Task<Message> {
        let Phase::Ready(gallery) = &mut self.phase else {
            return Task::none();
        };
        let batch = select(gallery);
        let reload = batch.is_some();

        let load = self.run_batch(batch);
        if reload {
            Task::batch([
                scrollable::scroll_to(ui::grid::grid_id(), scrollable::AbsoluteOffset { x: 0.0, y: 0.0 }),
                load,
            ])
        } else {
            load
        }
    }

    fn navigate(
        &mut self,
        step: impl FnOnce(&mut GalleryController<FetchedImage>) -> NavEffects,
    ) -> Task<Message> {
        let Phase::Ready(gallery) = &mut self.phase else {
            return Task::none();
        };
        let effects = step(gallery);
        Task::batch([
            self.run_batch(effects.batch),
            self.run_full_image(effects.full_image),
        ])
    }

    fn run_batch(&self, batch: Option<BatchRequest>) -> Task<Message> {
        match batch {
            Some(batch) => Task::run(
                source::stream_batch(&self.client, batch),
                Message::ThumbnailLoaded,
            ),
            None => Task::none(),
        }
    }

    fn run_full_image(&self, request: Option<FullImageRequest>) -> Task<Message> {
        match request {
            Some(request) => Task::perform(
                source::fetch_full(&self.client, request),
                Message::FullImageLoaded,
            ),
            None => Task::none(),
        }
    }
}

/// Wake up once the scroll throttle allows another check
fn settle_after(interval: Duration) -> Task<Message> {
    Task::perform(tokio::time::sleep(interval), |_| Message::ScrollSettled)
}

/// Arrow keys and Escape; the controller ignores them while the viewer is closed
fn modal_key(key: Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key.as_ref() {
        Key::Named(Named::ArrowLeft) => Some(Message::Key(ModalKey::ArrowLeft)),
        Key::Named(Named::ArrowRight) => Some(Message::Key(ModalKey::ArrowRight)),
        Key::Named(Named::Escape) => Some(Message::Key(ModalKey::Escape)),
        _ => None,
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("masonry_gallery=info")),
        )
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|err| {
        warn!("⚠️  {}; falling back to defaults", err);
        AppConfig::default()
    });

    iced::application("Gallery", Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .subscription(Gallery::subscription)
        .centered()
        .run_with(move || Gallery::new(config))
}
