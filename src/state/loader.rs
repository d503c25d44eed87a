/// Batch-wise incremental loading of thumbnails
///
/// The loader only tracks bookkeeping: which slice of the visible list is
/// next, whether a batch is in flight, and how many of its fetches are still
/// outstanding. The fetches themselves run in `net::source::stream_batch`.

use std::ops::Range;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Start loading more when the viewport bottom is this close to the content end
pub const SCROLL_PROXIMITY_PX: f32 = 500.0;

/// Minimum interval between two scroll-driven load checks
pub const SCROLL_THROTTLE: Duration = Duration::from_millis(100);

/// A batch the loader has committed to
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub generation: u64,
    pub range: Range<usize>,
    pub cancel: CancellationToken,
}

/// What a single fetch completion did to the batch counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome belongs to a batch that was reset away
    Stale,
    /// Fetches of the current batch are still outstanding
    Pending(usize),
    /// That was the last one; the loader is idle again
    BatchDone,
}

#[derive(Debug, Default)]
pub struct IncrementalLoader {
    next_unloaded: usize,
    busy: bool,
    outstanding: usize,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl IncrementalLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_unloaded(&self) -> usize {
        self.next_unloaded
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Commit to the next batch.
    ///
    /// Returns `None` while a batch is in flight or when everything visible
    /// has been requested. The busy flag and the cursor are updated before
    /// any fetch is issued, so a re-entrant call during the batch is rejected.
    pub fn begin_batch(&mut self, visible_len: usize, batch_size: usize) -> Option<BatchPlan> {
        if self.busy || self.next_unloaded >= visible_len {
            return None;
        }

        let start = self.next_unloaded;
        let end = (start + batch_size.max(1)).min(visible_len);
        let cancel = CancellationToken::new();

        self.busy = true;
        self.outstanding = end - start;
        self.next_unloaded = end;
        self.in_flight = Some(cancel.clone());

        Some(BatchPlan {
            generation: self.generation,
            range: start..end,
            cancel,
        })
    }

    /// Record one finished fetch (success or failure)
    pub fn complete_one(&mut self, generation: u64) -> Completion {
        if generation != self.generation || !self.busy {
            return Completion::Stale;
        }

        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 {
            self.busy = false;
            self.in_flight = None;
            Completion::BatchDone
        } else {
            Completion::Pending(self.outstanding)
        }
    }

    /// Forget all progress, cancelling the batch in flight
    pub fn reset(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
        self.next_unloaded = 0;
        self.outstanding = 0;
        self.busy = false;
    }
}

/// Limits how often scroll events may trigger a load check.
/// A check refused inside the interval is kept as the trailing one.
#[derive(Debug)]
pub struct ScrollThrottle {
    interval: Duration,
    last_fired: Option<Instant>,
    /// Distance to the bottom from the last refused check
    trailing: Option<f32>,
}

impl ScrollThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            trailing: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Remember a refused check; only the latest one is kept
    pub fn defer(&mut self, distance_to_bottom: f32) {
        self.trailing = Some(distance_to_bottom);
    }

    pub fn has_trailing(&self) -> bool {
        self.trailing.is_some()
    }

    pub fn take_trailing(&mut self) -> Option<f32> {
        self.trailing.take()
    }

    pub fn clear_trailing(&mut self) {
        self.trailing = None;
    }

    /// Returns true at most once per interval
    pub fn allow(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}

impl Default for ScrollThrottle {
    fn default() -> Self {
        Self::new(SCROLL_THROTTLE)
    }
}
