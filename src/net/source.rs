/// Async image fetching
///
/// A batch launches every thumbnail fetch at once and yields the outcomes in
/// the order they finish. A failed fetch still yields an outcome, so the
/// batch counters always reach zero.

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::FutureExt;

use crate::error::GalleryError;
use crate::state::controller::{
    BatchRequest, Dimensions, FullImageOutcome, FullImageRequest, ThumbnailOutcome,
};

/// Where images come from
pub trait ImageSource {
    type Image: Dimensions + Send + 'static;

    fn fetch_thumbnail(&self, url: &str) -> BoxFuture<'static, Result<Self::Image, GalleryError>>;

    fn fetch_full(&self, url: &str) -> BoxFuture<'static, Result<Self::Image, GalleryError>>;
}

pub type BatchStream<I> = FuturesUnordered<BoxFuture<'static, ThumbnailOutcome<I>>>;

/// Start every fetch of `batch`; the stream yields them in arrival order
pub fn stream_batch<S: ImageSource>(source: &S, batch: BatchRequest) -> BatchStream<S::Image> {
    let BatchRequest {
        generation,
        items,
        cancel,
    } = batch;

    items
        .into_iter()
        .map(|item| {
            let fetch = source.fetch_thumbnail(&item.url);
            let cancel = cancel.clone();
            async move {
                let result = tokio::select! {
                    _ = cancel.cancelled() => Err(GalleryError::Cancelled),
                    result = fetch => result,
                };
                ThumbnailOutcome {
                    generation,
                    index: item.index,
                    result,
                }
            }
            .boxed()
        })
        .collect()
}

/// Fetch the full-resolution image, racing the navigation token
pub fn fetch_full<S: ImageSource>(
    source: &S,
    request: FullImageRequest,
) -> BoxFuture<'static, FullImageOutcome<S::Image>> {
    let fetch = source.fetch_full(&request.url);
    let FullImageRequest { ticket, cancel, .. } = request;

    async move {
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(GalleryError::Cancelled),
            result = fetch => result,
        };
        FullImageOutcome { ticket, result }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::controller::{BatchItem, GalleryController};
    use crate::state::loader::Completion;
    use crate::state::navigator::RequestTicket;
    use crate::state::data::ImageRecord;
    use crate::state::router::CategoryMode;
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug, Clone, PartialEq)]
    struct Pixels(u32, u32);

    impl Dimensions for Pixels {
        fn dimensions(&self) -> (u32, u32) {
            (self.0, self.1)
        }
    }

    /// Serves every URL after a per-URL delay; URLs without a delay fail
    #[derive(Default)]
    struct DelayedSource {
        delays: HashMap<String, u64>,
    }

    impl DelayedSource {
        fn with(mut self, url: &str, millis: u64) -> Self {
            self.delays.insert(url.to_string(), millis);
            self
        }

        fn serve(&self, url: &str) -> BoxFuture<'static, Result<Pixels, GalleryError>> {
            let delay = self.delays.get(url).copied();
            let url = url.to_string();
            async move {
                match delay {
                    Some(ms) => {
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                        Ok(Pixels(100, 50 + ms as u32))
                    }
                    None => Err(GalleryError::Thumbnail {
                        url,
                        reason: "404 Not Found".to_string(),
                    }),
                }
            }
            .boxed()
        }
    }

    impl ImageSource for DelayedSource {
        type Image = Pixels;

        fn fetch_thumbnail(&self, url: &str) -> BoxFuture<'static, Result<Pixels, GalleryError>> {
            self.serve(url)
        }

        fn fetch_full(&self, url: &str) -> BoxFuture<'static, Result<Pixels, GalleryError>> {
            self.serve(url)
        }
    }

    fn batch(urls: &[&str]) -> BatchRequest {
        BatchRequest {
            generation: 0,
            items: urls
                .iter()
                .enumerate()
                .map(|(index, url)| BatchItem {
                    index,
                    url: url.to_string(),
                })
                .collect(),
            cancel: CancellationToken::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_arrive_in_completion_order() {
        let source = DelayedSource::default()
            .with("a", 300)
            .with("b", 100)
            .with("c", 200);

        let outcomes: Vec<_> = stream_batch(&source, batch(&["a", "b", "c"])).collect().await;
        let order: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_block_the_batch() {
        let source = DelayedSource::default().with("a", 50).with("c", 10);

        let outcomes: Vec<_> = stream_batch(&source, batch(&["a", "missing", "c"])).collect().await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|o| o.result.is_err()).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_batch_resolves_as_cancelled() {
        let source = DelayedSource::default().with("a", 10_000);
        let request = batch(&["a"]);
        request.cancel.cancel();

        let outcomes: Vec<_> = stream_batch(&source, request).collect().await;
        assert_eq!(outcomes[0].result, Err(GalleryError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_full_fetch_is_cancelled() {
        let source = DelayedSource::default().with("five", 500).with("eight", 100);
        let first = FullImageRequest {
            ticket: RequestTicket { index: 5, seq: 1 },
            url: "five".to_string(),
            cancel: CancellationToken::new(),
        };
        let second = FullImageRequest {
            ticket: RequestTicket { index: 8, seq: 2 },
            url: "eight".to_string(),
            cancel: CancellationToken::new(),
        };

        let first_cancel = first.cancel.clone();
        let slow = tokio::spawn(fetch_full(&source, first));
        first_cancel.cancel();

        let fast = fetch_full(&source, second).await;
        let slow = slow.await.unwrap();

        assert_eq!(slow.result, Err(GalleryError::Cancelled));
        assert_eq!(fast.result, Ok(Pixels(100, 150)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_driven_by_stream() {
        let records: Vec<ImageRecord> = (0..12)
            .map(|i| ImageRecord::new(format!("t{}", i), format!("o{}", i)))
            .collect();
        let source = (0..12).fold(DelayedSource::default(), |s, i| {
            if i == 4 {
                s
            } else {
                s.with(&format!("t{}", i), 10 * (12 - i as u64))
            }
        });

        let mut gallery: GalleryController<Pixels> =
            GalleryController::new(records, CategoryMode::Fixed.strategy(), 800.0);
        let request = gallery.load_next_batch().unwrap();
        assert!(gallery.load_next_batch().is_none());

        let mut stream = stream_batch(&source, request);
        let mut last = Completion::Pending(usize::MAX);
        while let Some(outcome) = stream.next().await {
            last = gallery.apply_thumbnail(outcome);
        }

        assert_eq!(last, Completion::BatchDone);
        assert_eq!(gallery.loader().next_unloaded(), 12);
        assert_eq!(gallery.layout().placed_count(), 11);
        assert!(gallery.load_next_batch().is_none());
    }
}
