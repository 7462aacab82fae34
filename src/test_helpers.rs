//! Test helpers shared by unit and integration tests
//!
//! [`ScriptedBackend`] stands in for the out-of-scope REST client: page
//! responses and mutation outcomes are queued ahead of time, every request
//! is recorded for assertion, and fetches/mutations can be held open to
//! exercise in-flight races deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use crate::backend::{FeedBackend, MutationKind, PageRequest};
use crate::domain::feed::{Counters, FeedItem, FeedKind, ItemId};
use crate::error::{FetchError, MutationFailure};

/// Builds a test item with the given id and creation time (seconds)
pub fn test_item(id: &str, secs: i64) -> FeedItem {
    test_item_with_counters(id, secs, Counters::default())
}

pub fn test_item_with_counters(id: &str, secs: i64, counters: Counters) -> FeedItem {
    FeedItem::new(id, "tester", timestamp(secs), counters)
}

/// Builds a newest-first page: the first id gets `newest_secs`, each
/// following id is ten seconds older.
pub fn descending_items(ids: &[&str], newest_secs: i64) -> Vec<FeedItem> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| test_item(id, newest_secs - (i as i64) * 10))
        .collect()
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMutation {
    pub id: ItemId,
    pub kind: MutationKind,
    pub desired: bool,
}

/// Scripted in-memory [`FeedBackend`] for tests
#[derive(Default)]
pub struct ScriptedBackend {
    pages: Mutex<VecDeque<Result<Vec<FeedItem>, FetchError>>>,
    mutations: Mutex<VecDeque<Result<(), MutationFailure>>>,
    fetch_log: Mutex<Vec<PageRequest>>,
    mutation_log: Mutex<Vec<RecordedMutation>>,
    fetches_held: AtomicBool,
    mutations_held: AtomicBool,
    fetch_gate: Notify,
    mutation_gate: Notify,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful page response
    pub fn push_page(&self, items: Vec<FeedItem>) {
        lock(&self.pages, "pages").push_back(Ok(items));
    }

    /// Queues a failed page response
    pub fn push_fetch_error(&self, err: FetchError) {
        lock(&self.pages, "pages").push_back(Err(err));
    }

    /// Queues a rejected mutation; unqueued mutations succeed
    pub fn push_mutation_failure(&self, reason: &str) {
        lock(&self.mutations, "mutations").push_back(Err(MutationFailure::new(reason)));
    }

    /// Parks subsequent fetches inside the backend until released
    pub fn hold_fetches(&self) {
        self.fetches_held.store(true, Ordering::SeqCst);
    }

    pub fn release_fetches(&self) {
        self.fetches_held.store(false, Ordering::SeqCst);
        self.fetch_gate.notify_waiters();
    }

    /// Parks subsequent mutations inside the backend until released
    pub fn hold_mutations(&self) {
        self.mutations_held.store(true, Ordering::SeqCst);
    }

    pub fn release_mutations(&self) {
        self.mutations_held.store(false, Ordering::SeqCst);
        self.mutation_gate.notify_waiters();
    }

    /// Every page request seen so far, in order
    pub fn fetch_requests(&self) -> Vec<PageRequest> {
        lock(&self.fetch_log, "fetch log").clone()
    }

    /// Every mutation request seen so far, in order
    pub fn mutation_requests(&self) -> Vec<RecordedMutation> {
        lock(&self.mutation_log, "mutation log").clone()
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex
        .lock()
        .unwrap_or_else(|_| panic!("BUG: scripted backend {what} lock poisoned"))
}

#[async_trait]
impl FeedBackend for ScriptedBackend {
    async fn fetch_page(
        &self,
        _feed: &FeedKind,
        request: &PageRequest,
    ) -> Result<Vec<FeedItem>, FetchError> {
        lock(&self.fetch_log, "fetch log").push(request.clone());

        while self.fetches_held.load(Ordering::SeqCst) {
            self.fetch_gate.notified().await;
        }

        lock(&self.pages, "pages")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn mutate(
        &self,
        id: &ItemId,
        kind: MutationKind,
        desired: bool,
    ) -> Result<(), MutationFailure> {
        lock(&self.mutation_log, "mutation log").push(RecordedMutation {
            id: id.clone(),
            kind,
            desired,
        });

        while self.mutations_held.load(Ordering::SeqCst) {
            self.mutation_gate.notified().await;
        }

        lock(&self.mutations, "mutations")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
