//! Timeline cursor: initial load, backward pagination, forward detection
//!
//! One cursor owns one [`FeedWindow`]. Every network call captures the
//! cursor generation before yielding and discards its own result if the
//! generation advanced (the owning view reset or went away) by the time it
//! resolves. In-flight latches make `load_initial`/`load_older`/`check_newer`
//! each self-serializing; `load_older` and `check_newer` may still overlap
//! each other because they extend disjoint boundaries.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::{FeedBackend, PageRequest};
use crate::domain::feed::{FeedItem, FeedKind, ItemId};
use crate::error::FetchError;
use crate::model::window::FeedWindow;

#[derive(Debug, Default)]
struct CursorState {
    window: FeedWindow,
    is_loading: bool,
    is_loading_more: bool,
    is_checking: bool,
    generation: u64,
    last_error: Option<FetchError>,
}

/// Maintains the paginated window for one feed instance
pub struct TimelineCursor {
    feed: FeedKind,
    page_size: usize,
    backend: Arc<dyn FeedBackend>,
    state: Mutex<CursorState>,
}

impl TimelineCursor {
    pub fn new(backend: Arc<dyn FeedBackend>, feed: FeedKind, page_size: usize) -> Self {
        Self {
            feed,
            page_size,
            backend,
            state: Mutex::new(CursorState::default()),
        }
    }

    pub fn feed(&self) -> &FeedKind {
        &self.feed
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// # Panics
    /// Panics if the state lock is poisoned (this indicates a bug in the implementation)
    fn state(&self) -> MutexGuard<'_, CursorState> {
        self.state.lock().expect("BUG: cursor state lock poisoned")
    }

    /// Fetches the first page and replaces the window wholesale.
    ///
    /// A second call while one is in flight is dropped. On failure the
    /// window is left unchanged and the error is kept as view-local state
    /// until the caller retries.
    pub async fn load_initial(&self) -> Result<(), FetchError> {
        let generation = {
            let mut state = self.state();
            if state.is_loading {
                return Ok(());
            }
            state.is_loading = true;
            state.last_error = None;
            state.generation
        };

        let request = PageRequest::newest(self.page_size);
        let result = self.backend.fetch_page(&self.feed, &request).await;

        let mut state = self.state();
        if state.generation != generation {
            log::debug!("discarding stale initial load for {} feed", self.feed);
            return Ok(());
        }
        state.is_loading = false;

        match result {
            Ok(page) => {
                let has_older = page.len() == self.page_size;
                state.window.replace_all(page, has_older);
                Ok(())
            }
            Err(err) => {
                state.last_error = Some(err.clone());
                log::warn!("initial load failed for {} feed: {err}", self.feed);
                Err(err)
            }
        }
    }

    /// Fetches a page strictly older than the current tail and appends it.
    ///
    /// No-op when a load is already in flight, when the backend has no older
    /// items, or when the window is empty. "Has more" is inferred from page
    /// fullness: a final page of exactly `page_size` items costs one extra
    /// empty round-trip, which this contract accepts since the backend
    /// reports no totals.
    pub async fn load_older(&self) -> Result<(), FetchError> {
        let (tail, generation) = {
            let mut state = self.state();
            if state.is_loading_more || !state.window.has_older() || state.window.is_empty() {
                return Ok(());
            }
            let tail = match state.window.tail_id() {
                Some(tail) => tail.clone(),
                None => return Ok(()),
            };
            state.is_loading_more = true;
            state.last_error = None;
            (tail, state.generation)
        };

        let request = PageRequest::before(self.page_size, tail);
        let result = self.backend.fetch_page(&self.feed, &request).await;

        let mut state = self.state();
        if state.generation != generation {
            log::debug!("discarding stale older page for {} feed", self.feed);
            return Ok(());
        }
        state.is_loading_more = false;

        match result {
            Ok(page) => {
                let has_older = page.len() == self.page_size;
                let appended = state.window.append_older(page);
                state.window.set_has_older(has_older);
                log::debug!(
                    "appended {appended} older item(s) to {} feed, has_older={has_older}",
                    self.feed
                );
                Ok(())
            }
            Err(err) => {
                state.last_error = Some(err.clone());
                log::warn!("older page load failed for {} feed: {err}", self.feed);
                Err(err)
            }
        }
    }

    /// Fetches items strictly newer than the current head without touching
    /// the window; detected items belong to the merge controller.
    ///
    /// Self-serialized: an overlapping call is dropped and returns empty.
    /// Errors are returned to the caller (the poll scheduler swallows and
    /// logs them) and are never stored as view state.
    pub async fn check_newer(&self) -> Result<Vec<FeedItem>, FetchError> {
        let (head, generation) = {
            let mut state = self.state();
            if state.is_checking {
                return Ok(Vec::new());
            }
            let head = match state.window.head_id() {
                Some(head) => head.clone(),
                None => return Ok(Vec::new()),
            };
            state.is_checking = true;
            (head, state.generation)
        };

        let request = PageRequest::after(self.page_size, head);
        let result = self.backend.fetch_page(&self.feed, &request).await;

        let mut state = self.state();
        if state.generation != generation {
            log::debug!("discarding stale newer check for {} feed", self.feed);
            return Ok(Vec::new());
        }
        state.is_checking = false;

        result
    }

    /// Clears the window and cursors; equivalent to preparing a fresh
    /// `load_initial`. Any fetch still in flight resolves against a stale
    /// generation and is discarded.
    pub fn reset(&self) {
        let mut state = self.state();
        state.window.clear();
        state.is_loading = false;
        state.is_loading_more = false;
        state.is_checking = false;
        state.last_error = None;
        state.generation += 1;
    }

    /// Prepends already-deduplicated newer items ahead of the head.
    /// Used by the merge controller on flush.
    pub(crate) fn prepend_newer(&self, items: Vec<FeedItem>) -> usize {
        self.state().window.prepend_newer(items)
    }

    // === Read surface ===

    pub fn items(&self) -> Vec<FeedItem> {
        self.state().window.items().to_vec()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.state().window.contains(id)
    }

    pub fn head_id(&self) -> Option<ItemId> {
        self.state().window.head_id().cloned()
    }

    pub fn tail_id(&self) -> Option<ItemId> {
        self.state().window.tail_id().cloned()
    }

    pub fn len(&self) -> usize {
        self.state().window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().window.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.state().is_loading_more
    }

    pub fn has_older(&self) -> bool {
        self.state().window.has_older()
    }

    pub fn last_error(&self) -> Option<FetchError> {
        self.state().last_error.clone()
    }
}

impl std::fmt::Debug for TimelineCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("TimelineCursor")
            .field("feed", &self.feed)
            .field("page_size", &self.page_size)
            .field("len", &state.window.len())
            .field("has_older", &state.window.has_older())
            .finish_non_exhaustive()
    }
}
