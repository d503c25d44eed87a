/// The gallery controller
///
/// One `GalleryController` is built per loaded catalog and owns every piece of
/// mutable gallery state: catalog filter, columns, load cursor and viewer.
/// It never performs I/O itself. Operations that need fetching return a
/// request (`BatchRequest`, `FullImageRequest`) that the caller runs, and the
/// results come back through `apply_thumbnail` / `apply_full_image`.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::catalog::{Category, ImageCatalog};
use super::data::ImageRecord;
use super::layout::{breakpoint_for, column_width_for, ColumnLayout, PlacedImage};
use super::loader::{Completion, IncrementalLoader, ScrollThrottle, SCROLL_PROXIMITY_PX};
use super::navigator::{ModalKey, ModalNavigator, NavControls, RequestTicket};
use super::router::{CategoryRouter, CategoryStrategy};
use crate::error::GalleryError;

/// Caption line shown under every full-size image
pub const CAPTION_SOURCE: &str = "Images from the Internet";

/// Pixel size of a decoded image
pub trait Dimensions {
    fn dimensions(&self) -> (u32, u32);
}

/// One thumbnail to fetch as part of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub generation: u64,
    pub items: Vec<BatchItem>,
    pub cancel: CancellationToken,
}

/// Result of one thumbnail fetch
#[derive(Debug, Clone)]
pub struct ThumbnailOutcome<I> {
    pub generation: u64,
    pub index: usize,
    pub result: Result<I, GalleryError>,
}

#[derive(Debug, Clone)]
pub struct FullImageRequest {
    pub ticket: RequestTicket,
    pub url: String,
    pub cancel: CancellationToken,
}

/// Result of one full-resolution fetch
#[derive(Debug, Clone)]
pub struct FullImageOutcome<I> {
    pub ticket: RequestTicket,
    pub result: Result<I, GalleryError>,
}

/// Work requested by a navigation step
#[derive(Debug, Default)]
pub struct NavEffects {
    pub batch: Option<BatchRequest>,
    pub full_image: Option<FullImageRequest>,
}

pub struct GalleryController<I> {
    catalog: ImageCatalog,
    router: CategoryRouter,
    layout: ColumnLayout,
    loader: IncrementalLoader,
    throttle: ScrollThrottle,
    navigator: ModalNavigator,
    /// Successfully loaded thumbnails, keyed by visible index
    loaded: BTreeMap<usize, I>,
    modal_image: Option<I>,
    viewport_width: f32,
}

impl<I: Dimensions> GalleryController<I> {
    pub fn new(
        records: Vec<ImageRecord>,
        strategy: Box<dyn CategoryStrategy>,
        viewport_width: f32,
    ) -> Self {
        let router = CategoryRouter::new(strategy, &records);
        let catalog = ImageCatalog::new(records);
        info!(
            "🖼️  Gallery ready with {} images ({} columns)",
            catalog.visible_len(),
            breakpoint_for(viewport_width).columns
        );

        Self {
            catalog,
            router,
            layout: ColumnLayout::for_viewport(viewport_width),
            loader: IncrementalLoader::new(),
            throttle: ScrollThrottle::default(),
            navigator: ModalNavigator::new(),
            loaded: BTreeMap::new(),
            modal_image: None,
            viewport_width,
        }
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    pub fn router(&self) -> &CategoryRouter {
        &self.router
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn loader(&self) -> &IncrementalLoader {
        &self.loader
    }

    pub fn navigator(&self) -> &ModalNavigator {
        &self.navigator
    }

    pub fn loaded(&self, index: usize) -> Option<&I> {
        self.loaded.get(&index)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_busy()
    }

    pub fn batch_size(&self) -> usize {
        breakpoint_for(self.viewport_width).batch_size
    }

    // ========== Incremental loading ==========

    /// Start the next batch of thumbnail fetches, if the loader is idle
    pub fn load_next_batch(&mut self) -> Option<BatchRequest> {
        let plan = self
            .loader
            .begin_batch(self.catalog.visible_len(), self.batch_size())?;

        let items = plan
            .range
            .clone()
            .filter_map(|index| {
                self.catalog.visible(index).map(|record| BatchItem {
                    index,
                    url: record.thumbnail.clone(),
                })
            })
            .collect();

        debug!("📦 Batch {:?} started (generation {})", plan.range, plan.generation);

        Some(BatchRequest {
            generation: plan.generation,
            items,
            cancel: plan.cancel,
        })
    }

    /// Feed one thumbnail completion back in, in arrival order
    pub fn apply_thumbnail(&mut self, outcome: ThumbnailOutcome<I>) -> Completion {
        let completion = self.loader.complete_one(outcome.generation);
        if completion == Completion::Stale {
            debug!("Dropping stale thumbnail #{}", outcome.index);
            return completion;
        }

        match outcome.result {
            Ok(image) => {
                let (width, height) = image.dimensions();
                let column = self.layout.place_image(PlacedImage {
                    index: outcome.index,
                    width,
                    height,
                });
                self.loaded.insert(outcome.index, image);
                debug!("Placed thumbnail #{} in column {}", outcome.index, column);
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => warn!("⚠️  {}", err),
        }

        if completion == Completion::BatchDone {
            debug!(
                "✅ Batch done: {} of {} images loaded",
                self.loaded.len(),
                self.loader.next_unloaded()
            );
        }
        completion
    }

    /// Scroll position changed; loads more when near the bottom.
    /// A check refused by the throttle is kept; see [`Self::settle_scroll`].
    pub fn on_scroll(&mut self, distance_to_bottom: f32, now: Instant) -> Option<BatchRequest> {
        self.throttle.clear_trailing();

        // the grid is covered while the viewer is open
        if self.navigator.is_open() || distance_to_bottom > SCROLL_PROXIMITY_PX {
            return None;
        }
        if self.loader.is_busy() || self.loader.next_unloaded() >= self.catalog.visible_len() {
            return None;
        }
        if !self.throttle.allow(now) {
            self.throttle.defer(distance_to_bottom);
            return None;
        }
        self.load_next_batch()
    }

    /// Re-run the last check the throttle refused, once its interval has passed
    pub fn settle_scroll(&mut self, now: Instant) -> Option<BatchRequest> {
        let distance = self.throttle.take_trailing()?;
        self.on_scroll(distance, now)
    }

    /// True while a refused scroll check waits for [`Self::settle_scroll`]
    pub fn has_trailing_scroll(&self) -> bool {
        self.throttle.has_trailing()
    }

    pub fn scroll_interval(&self) -> Duration {
        self.throttle.interval()
    }

    // ========== Layout ==========

    /// Viewport width changed. When the column count changes the loaded images
    /// are replayed into fresh columns and the next batch is started, since the
    /// denser grid may no longer be tall enough to scroll.
    pub fn resize(&mut self, viewport_width: f32) -> Option<BatchRequest> {
        self.viewport_width = viewport_width;
        let columns = breakpoint_for(viewport_width).columns;
        self.layout
            .set_column_width(column_width_for(viewport_width, columns));

        if columns == self.layout.column_count() {
            return None;
        }

        info!("📐 Relayout into {} columns", columns);
        self.layout.set_column_count(columns);
        self.layout.reset_and_replay(self.loaded.iter().map(|(&index, image)| {
            let (width, height) = image.dimensions();
            PlacedImage { index, width, height }
        }));
        self.load_next_batch()
    }

    // ========== Categories ==========

    /// Switch the filter and restart loading from the top.
    /// No-op when `category` is already active.
    pub fn select_category(&mut self, category: Category) -> Option<BatchRequest> {
        if !self.catalog.set_category(category) {
            return None;
        }
        info!(
            "🏷️  Category {} ({} images)",
            self.catalog.active_category(),
            self.catalog.visible_len()
        );

        self.close();
        self.loader.reset();
        self.loaded.clear();
        self.layout.reset_and_replay(std::iter::empty());
        self.load_next_batch()
    }

    pub fn select_all(&mut self) -> Option<BatchRequest> {
        let category = self.router.select_all();
        self.select_category(category)
    }

    /// Reveal the style buttons for a size
    pub fn select_size(&mut self, size: &str) {
        self.router.select_size(size, self.catalog.records());
    }

    pub fn select_style(&mut self, style: &str) -> Option<BatchRequest> {
        let category = self.router.select_style(style)?;
        self.select_category(category)
    }

    // ========== Viewer ==========

    pub fn open(&mut self, index: usize) -> Option<FullImageRequest> {
        if !self.navigator.is_open() {
            self.modal_image = None;
        }
        self.transition_to(index)
    }

    /// Step forward, extending the loaded window first when the target is
    /// at or past the load cursor
    pub fn next(&mut self) -> NavEffects {
        let Some(target) = self.navigator.next_index(self.catalog.visible_len()) else {
            return NavEffects::default();
        };

        let batch = if target >= self.loader.next_unloaded() {
            self.load_next_batch()
        } else {
            None
        };

        NavEffects {
            batch,
            full_image: self.transition_to(target),
        }
    }

    pub fn prev(&mut self) -> Option<FullImageRequest> {
        let target = self.navigator.prev_index()?;
        self.transition_to(target)
    }

    pub fn close(&mut self) {
        self.navigator.close();
        self.modal_image = None;
    }

    /// Keyboard input; ignored while the viewer is closed
    pub fn handle_key(&mut self, key: ModalKey) -> NavEffects {
        if !self.navigator.is_open() {
            return NavEffects::default();
        }

        match key {
            ModalKey::ArrowLeft => NavEffects {
                batch: None,
                full_image: self.prev(),
            },
            ModalKey::ArrowRight => self.next(),
            ModalKey::Escape => {
                self.close();
                NavEffects::default()
            }
        }
    }

    /// Feed a full-resolution completion back in. Returns true if it was
    /// displayed; superseded requests are ignored.
    pub fn apply_full_image(&mut self, outcome: FullImageOutcome<I>) -> bool {
        if !self.navigator.settle(outcome.ticket) {
            debug!("Ignoring superseded image #{}", outcome.ticket.index);
            return false;
        }

        match outcome.result {
            Ok(image) => {
                self.modal_image = Some(image);
                true
            }
            Err(err) => {
                warn!("⚠️  {}", err);
                false
            }
        }
    }

    pub fn modal_image(&self) -> Option<&I> {
        self.modal_image.as_ref()
    }

    /// File name of the image the viewer is on
    pub fn caption(&self) -> Option<String> {
        let index = self.navigator.current()?;
        self.catalog.visible(index).map(|record| record.file_name())
    }

    pub fn nav_controls(&self) -> Option<NavControls> {
        self.navigator.controls(self.catalog.visible_len())
    }

    fn transition_to(&mut self, index: usize) -> Option<FullImageRequest> {
        let url = self.catalog.visible(index)?.original.clone();
        let transition = self.navigator.open(index, self.catalog.visible_len())?;
        Some(FullImageRequest {
            ticket: transition.ticket,
            url,
            cancel: transition.cancel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::router::CategoryMode;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct TestImage(u32, u32);

    impl Dimensions for TestImage {
        fn dimensions(&self) -> (u32, u32) {
            (self.0, self.1)
        }
    }

    fn records(n: usize) -> Vec<ImageRecord> {
        (0..n)
            .map(|i| {
                let style = if i % 3 == 0 { "Crafts" } else { "Ornaments" };
                ImageRecord::new(
                    format!("/thumbs/S-{}-{}.jpg", style, i),
                    format!("/full/S-{}-{}.jpg", style, i),
                )
            })
            .collect()
    }

    fn controller(n: usize, width: f32) -> GalleryController<TestImage> {
        GalleryController::new(records(n), CategoryMode::Fixed.strategy(), width)
    }

    fn complete(gallery: &mut GalleryController<TestImage>, batch: &BatchRequest) {
        for item in &batch.items {
            gallery.apply_thumbnail(ThumbnailOutcome {
                generation: batch.generation,
                index: item.index,
                result: Ok(TestImage(100, 80 + item.index as u32)),
            });
        }
    }

    fn open_at(gallery: &mut GalleryController<TestImage>, index: usize) {
        // fill the window up to `index` so navigation starts from a realistic state
        while gallery.loader().next_unloaded() <= index {
            let batch = gallery.load_next_batch().unwrap();
            complete(gallery, &batch);
        }
        gallery.open(index).unwrap();
    }

    #[test]
    fn test_small_catalog_loads_in_one_batch() {
        let mut gallery = controller(12, 800.0);
        assert_eq!(gallery.layout().column_count(), 3);

        let batch = gallery.load_next_batch().unwrap();
        assert_eq!(batch.items.len(), 12);
        assert_eq!(gallery.loader().next_unloaded(), 12);
        assert!(gallery.load_next_batch().is_none());

        complete(&mut gallery, &batch);
        assert!(gallery.load_next_batch().is_none());
        assert_eq!(gallery.layout().placed_count(), 12);
    }

    #[test]
    fn test_double_call_yields_one_batch() {
        let mut gallery = controller(40, 500.0);
        let first = gallery.load_next_batch();
        let second = gallery.load_next_batch();
        assert_eq!(first.unwrap().items.len(), 10);
        assert!(second.is_none());
    }

    #[test]
    fn test_failed_thumbnail_is_dropped_but_batch_completes() {
        let mut gallery = controller(3, 500.0);
        let batch = gallery.load_next_batch().unwrap();

        gallery.apply_thumbnail(ThumbnailOutcome {
            generation: batch.generation,
            index: 1,
            result: Err(GalleryError::Thumbnail {
                url: "/thumbs/x.jpg".into(),
                reason: "404".into(),
            }),
        });
        gallery.apply_thumbnail(ThumbnailOutcome {
            generation: batch.generation,
            index: 2,
            result: Ok(TestImage(10, 10)),
        });
        let last = gallery.apply_thumbnail(ThumbnailOutcome {
            generation: batch.generation,
            index: 0,
            result: Ok(TestImage(10, 10)),
        });

        assert_eq!(last, Completion::BatchDone);
        assert!(!gallery.is_loading());
        assert_eq!(gallery.layout().placed_count(), 2);
        assert!(gallery.loaded(1).is_none());
    }

    #[test]
    fn test_placement_follows_arrival_order() {
        let mut gallery = controller(2, 500.0);
        let batch = gallery.load_next_batch().unwrap();
        for index in [1, 0] {
            gallery.apply_thumbnail(ThumbnailOutcome {
                generation: batch.generation,
                index,
                result: Ok(TestImage(100, 100)),
            });
        }
        let first_column: Vec<usize> = gallery.layout().columns()[0]
            .items()
            .iter()
            .map(|p| p.index)
            .collect();
        assert_eq!(first_column, vec![1]);
    }

    #[test]
    fn test_resize_across_breakpoint_replays() {
        let mut gallery = controller(30, 800.0);
        let batch = gallery.load_next_batch().unwrap();
        complete(&mut gallery, &batch);
        assert_eq!(gallery.layout().placed_count(), 15);

        assert!(gallery.resize(850.0).is_none());
        assert_eq!(gallery.layout().column_count(), 3);

        let batch = gallery.resize(1300.0).unwrap();
        assert_eq!(gallery.layout().column_count(), 5);
        assert_eq!(gallery.layout().placed_count(), 15);
        assert_eq!(batch.items.first().map(|i| i.index), Some(15));
        assert_eq!(batch.items.len(), 15);
        assert!(gallery.resize(1400.0).is_none());
    }

    #[test]
    fn test_resize_across_breakpoint_starts_one_batch() {
        let mut gallery = controller(50, 500.0);
        let batch = gallery.load_next_batch().unwrap();
        complete(&mut gallery, &batch);
        assert_eq!(gallery.loader().next_unloaded(), 10);

        let batch = gallery.resize(1600.0).unwrap();
        assert_eq!(gallery.layout().column_count(), 6);
        assert_eq!(gallery.layout().placed_count(), 10);
        assert_eq!(batch.items.len(), 25);
        assert!(gallery.is_loading());
        assert_eq!(gallery.loader().next_unloaded(), 35);

        // a second breakpoint crossing while busy only relays the columns
        assert!(gallery.resize(700.0).is_none());
        assert_eq!(gallery.layout().column_count(), 3);
        assert_eq!(gallery.loader().next_unloaded(), 35);
    }

    #[test]
    fn test_select_category_resets_cursor_and_filters() {
        let mut gallery = controller(30, 500.0);
        let batch = gallery.load_next_batch().unwrap();
        complete(&mut gallery, &batch);

        gallery.select_size("S");
        let batch = gallery.select_style("Crafts").unwrap();

        assert_eq!(gallery.catalog().visible_len(), 10);
        assert_eq!(gallery.layout().placed_count(), 0);
        assert_eq!(batch.items.len(), 10);
        assert!(gallery
            .catalog()
            .visible_records()
            .all(|r| r.file_name().starts_with("S-Crafts-")));
        assert_eq!(batch.items[0].url, "/thumbs/S-Crafts-0.jpg");
        assert_eq!(batch.items[1].url, "/thumbs/S-Crafts-3.jpg");

        // selecting the same category again does nothing
        assert!(gallery.select_style("Crafts").is_none());
    }

    #[test]
    fn test_category_change_discards_in_flight_batch() {
        let mut gallery = controller(30, 500.0);
        let stale = gallery.load_next_batch().unwrap();

        gallery.select_size("S");
        let fresh = gallery.select_style("Ornaments").unwrap();
        assert!(stale.cancel.is_cancelled());

        let completion = gallery.apply_thumbnail(ThumbnailOutcome {
            generation: stale.generation,
            index: 0,
            result: Ok(TestImage(100, 100)),
        });
        assert_eq!(completion, Completion::Stale);
        assert_eq!(gallery.layout().placed_count(), 0);

        complete(&mut gallery, &fresh);
        assert_eq!(gallery.layout().placed_count(), 10);
    }

    #[test]
    fn test_scroll_proximity_and_throttle() {
        let mut gallery = controller(50, 500.0);
        let t0 = Instant::now();

        assert!(gallery.on_scroll(900.0, t0).is_none());
        let batch = gallery.on_scroll(200.0, t0 + Duration::from_millis(150)).unwrap();
        complete(&mut gallery, &batch);

        // inside the throttle window the check is deferred
        assert!(gallery.on_scroll(0.0, t0 + Duration::from_millis(200)).is_none());
        assert!(gallery.has_trailing_scroll());
        assert!(gallery.on_scroll(0.0, t0 + Duration::from_millis(260)).is_some());
        assert!(!gallery.has_trailing_scroll());
    }

    #[test]
    fn test_far_scroll_does_not_use_up_the_throttle() {
        let mut gallery = controller(50, 500.0);
        let batch = gallery.load_next_batch().unwrap();
        complete(&mut gallery, &batch);

        let t0 = Instant::now();
        assert!(gallery.on_scroll(1500.0, t0).is_none());
        let batch = gallery.on_scroll(0.0, t0 + Duration::from_millis(50)).unwrap();
        assert_eq!(batch.items.first().map(|i| i.index), Some(10));
        assert_eq!(gallery.loader().next_unloaded(), 20);
    }

    #[test]
    fn test_trailing_scroll_check_loads_after_interval() {
        let mut gallery = controller(50, 500.0);
        let t0 = Instant::now();

        let batch = gallery.on_scroll(100.0, t0).unwrap();
        complete(&mut gallery, &batch);

        // the last event of a fast scroll lands inside the window
        assert!(gallery.on_scroll(0.0, t0 + Duration::from_millis(30)).is_none());
        assert!(gallery.has_trailing_scroll());

        let settle_at = t0 + Duration::from_millis(30) + gallery.scroll_interval();
        let batch = gallery.settle_scroll(settle_at).unwrap();
        assert_eq!(batch.items.first().map(|i| i.index), Some(10));
        assert!(!gallery.has_trailing_scroll());
        assert!(gallery.settle_scroll(settle_at).is_none());
    }

    #[test]
    fn test_scroll_ignored_while_viewer_open() {
        let mut gallery = controller(50, 500.0);
        open_at(&mut gallery, 0);

        let t0 = Instant::now();
        assert!(gallery.on_scroll(0.0, t0).is_none());
        assert!(!gallery.has_trailing_scroll());
        assert_eq!(gallery.loader().next_unloaded(), 10);

        gallery.close();
        assert!(gallery.on_scroll(0.0, t0 + Duration::from_millis(10)).is_some());
    }

    #[test]
    fn test_next_extends_window_only_at_edge() {
        let mut gallery = controller(30, 500.0);
        open_at(&mut gallery, 0);
        assert_eq!(gallery.loader().next_unloaded(), 10);

        for expected in 1..=9 {
            let effects = gallery.next();
            assert!(effects.batch.is_none());
            assert_eq!(effects.full_image.unwrap().ticket.index, expected);
        }

        let effects = gallery.next();
        let batch = effects.batch.expect("edge of the window loads a batch");
        assert_eq!(batch.items.first().map(|i| i.index), Some(10));
        assert_eq!(effects.full_image.unwrap().ticket.index, 10);
        assert_eq!(gallery.loader().next_unloaded(), 20);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut gallery = controller(3, 500.0);
        open_at(&mut gallery, 0);

        assert!(gallery.prev().is_none());
        assert_eq!(
            gallery.nav_controls(),
            Some(NavControls { show_prev: false, show_next: true })
        );

        gallery.next();
        gallery.next();
        let effects = gallery.next();
        assert!(effects.full_image.is_none());
        assert_eq!(gallery.navigator().current(), Some(2));
        assert_eq!(
            gallery.nav_controls(),
            Some(NavControls { show_prev: true, show_next: false })
        );
    }

    #[test]
    fn test_superseded_full_image_is_ignored() {
        let mut gallery = controller(12, 800.0);
        open_at(&mut gallery, 5);
        let first = {
            gallery.close();
            gallery.open(5).unwrap()
        };
        let second = gallery.open(8).unwrap();
        assert!(first.cancel.is_cancelled());

        let late = gallery.apply_full_image(FullImageOutcome {
            ticket: first.ticket,
            result: Ok(TestImage(1, 1)),
        });
        assert!(!late);
        assert!(gallery.modal_image().is_none());

        assert!(gallery.apply_full_image(FullImageOutcome {
            ticket: second.ticket,
            result: Ok(TestImage(8, 8)),
        }));
        assert_eq!(gallery.modal_image(), Some(&TestImage(8, 8)));
        assert_eq!(gallery.caption().as_deref(), Some("S-Ornaments-8.jpg"));
    }

    #[test]
    fn test_full_image_error_keeps_prior_image() {
        let mut gallery = controller(5, 500.0);
        open_at(&mut gallery, 0);
        let first = gallery.open(1).unwrap();
        gallery.apply_full_image(FullImageOutcome {
            ticket: first.ticket,
            result: Ok(TestImage(3, 3)),
        });

        let second = gallery.next().full_image.unwrap();
        let shown = gallery.apply_full_image(FullImageOutcome {
            ticket: second.ticket,
            result: Err(GalleryError::FullImage {
                url: "/full/x.jpg".into(),
                reason: "500".into(),
            }),
        });

        assert!(!shown);
        assert!(gallery.navigator().is_open());
        assert_eq!(gallery.modal_image(), Some(&TestImage(3, 3)));
    }

    #[test]
    fn test_keys_only_while_open() {
        let mut gallery = controller(5, 500.0);
        let effects = gallery.handle_key(ModalKey::ArrowRight);
        assert!(effects.full_image.is_none() && effects.batch.is_none());

        open_at(&mut gallery, 1);
        assert_eq!(gallery.handle_key(ModalKey::ArrowLeft).full_image.unwrap().ticket.index, 0);
        assert_eq!(gallery.handle_key(ModalKey::ArrowRight).full_image.unwrap().ticket.index, 1);
        gallery.handle_key(ModalKey::Escape);
        assert!(!gallery.navigator().is_open());
    }

    #[test]
    fn test_category_change_closes_viewer() {
        let mut gallery = controller(12, 500.0);
        open_at(&mut gallery, 9);
        let pending = gallery.open(11).unwrap();

        gallery.select_size("S");
        gallery.select_style("Crafts");
        assert!(!gallery.navigator().is_open());
        assert!(pending.cancel.is_cancelled());
    }
}
