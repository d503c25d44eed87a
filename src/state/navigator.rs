/// Full-screen viewer navigation
///
/// A two-state machine (`Closed`, `Open(index)`). Every transition into an
/// index issues a fresh cancellation token and request sequence number and
/// cancels the previous one, so at most one full-resolution fetch is live and
/// a superseded completion can always be recognised as stale.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open { index: usize },
}

/// Identifies one full-resolution request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub index: usize,
    pub seq: u64,
}

/// Issued on every transition into a new index
#[derive(Debug, Clone)]
pub struct Transition {
    pub ticket: RequestTicket,
    pub cancel: CancellationToken,
}

/// Which navigation buttons are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub show_prev: bool,
    pub show_next: bool,
}

/// Keys the viewer reacts to while open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    ArrowLeft,
    ArrowRight,
    Escape,
}

/// Button visibility for `index` in a list of `len` images
pub fn nav_controls(index: usize, len: usize) -> NavControls {
    NavControls {
        show_prev: index > 0,
        show_next: index + 1 < len,
    }
}

#[derive(Debug)]
struct Pending {
    seq: u64,
    cancel: CancellationToken,
}

#[derive(Debug)]
pub struct ModalNavigator {
    state: ModalState,
    seq: u64,
    pending: Option<Pending>,
}

impl Default for ModalNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalNavigator {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            seq: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn current(&self) -> Option<usize> {
        match self.state {
            ModalState::Open { index } => Some(index),
            ModalState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.current().is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Open (or retarget) the viewer at `index`. Out-of-range indices are ignored.
    pub fn open(&mut self, index: usize, len: usize) -> Option<Transition> {
        if index >= len {
            return None;
        }

        self.cancel_pending();
        self.seq += 1;
        let cancel = CancellationToken::new();
        self.pending = Some(Pending {
            seq: self.seq,
            cancel: cancel.clone(),
        });
        self.state = ModalState::Open { index };

        Some(Transition {
            ticket: RequestTicket { index, seq: self.seq },
            cancel,
        })
    }

    /// Index `next` would move to, if any
    pub fn next_index(&self, len: usize) -> Option<usize> {
        self.current().map(|i| i + 1).filter(|&i| i < len)
    }

    /// Index `prev` would move to, if any
    pub fn prev_index(&self) -> Option<usize> {
        self.current().and_then(|i| i.checked_sub(1))
    }

    pub fn close(&mut self) {
        self.cancel_pending();
        self.state = ModalState::Closed;
    }

    /// Whether `ticket` is the request the viewer is waiting for
    pub fn is_live(&self, ticket: RequestTicket) -> bool {
        self.current() == Some(ticket.index)
            && self
                .pending
                .as_ref()
                .is_some_and(|p| p.seq == ticket.seq && !p.cancel.is_cancelled())
    }

    /// Mark the live request as finished. Returns false for stale tickets.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_live(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn controls(&self, len: usize) -> Option<NavControls> {
        self.current().map(|i| nav_controls(i, len))
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
    }
}
