//! Per-feed-view session facade
//!
//! Wires one timeline cursor, its merge controller and poll scheduler
//! together with the process-wide mutation store, and exposes the surface a
//! feed view renders from: the (optionally ranked) item list, loading
//! flags, the retryable fetch error, the pending new-item count, and the
//! imperative load/refresh/merge/toggle operations.

use std::sync::Arc;

use chrono::Utc;

use crate::backend::FeedBackend;
use crate::config::FeedConfig;
use crate::domain::feed::{FeedItem, FeedKind, ItemId};
use crate::domain::ranking::RankingScorer;
use crate::error::{FetchError, MutationError};
use crate::infrastructure::poll::{PollPhase, PollScheduler};
use crate::model::merge::MergeController;
use crate::model::timeline::TimelineCursor;
use crate::repositories::mutation::{LikeState, MutationStore};

pub struct FeedSession {
    config: FeedConfig,
    cursor: Arc<TimelineCursor>,
    merge: Arc<MergeController>,
    poller: PollScheduler,
    mutations: Arc<MutationStore>,
    scorer: RankingScorer,
}

impl FeedSession {
    /// Creates a session for one feed view. The mutation store is shared:
    /// pass the same `Arc` to every session of the application so a like
    /// applied in one view is visible in all of them.
    pub fn new(
        backend: Arc<dyn FeedBackend>,
        feed: FeedKind,
        config: FeedConfig,
        mutations: Arc<MutationStore>,
    ) -> Self {
        let cursor = Arc::new(TimelineCursor::new(backend, feed, config.page_size));
        let merge = Arc::new(MergeController::new(Arc::clone(&cursor)));
        let poller = PollScheduler::new(
            Arc::clone(&cursor),
            Arc::clone(&merge),
            config.poll_interval(),
        );
        let scorer = RankingScorer::new(config.ranking.weights);

        Self {
            config,
            cursor,
            merge,
            poller,
            mutations,
            scorer,
        }
    }

    // === Loading ===

    /// Loads the first page and seeds the mutation store from it
    pub async fn load_initial(&self) -> Result<(), FetchError> {
        self.cursor.load_initial().await?;
        self.hydrate_mutations();
        Ok(())
    }

    /// Loads the next older page ("load more"); no-op when exhausted or
    /// already loading
    pub async fn load_more(&self) -> Result<(), FetchError> {
        self.cursor.load_older().await?;
        self.hydrate_mutations();
        Ok(())
    }

    /// Discards the window and any detected items, then reloads from the top
    pub async fn refresh(&self) -> Result<(), FetchError> {
        self.merge.dismiss();
        self.cursor.reset();
        self.load_initial().await
    }

    /// Merges detected newer items into the window ("show N new posts").
    /// Returns how many items were merged.
    pub fn load_new(&self) -> usize {
        let merged = self.merge.flush();
        if merged > 0 {
            self.hydrate_mutations();
        }
        merged
    }

    /// Drops detected newer items without showing them
    pub fn dismiss_new(&self) {
        self.merge.dismiss();
    }

    // === Polling ===

    pub fn start_polling(&self) {
        self.poller.enable();
    }

    pub fn stop_polling(&self) {
        self.poller.disable();
    }

    pub fn poll_phase(&self) -> PollPhase {
        self.poller.phase()
    }

    // === Read surface ===

    /// The current window, with like counts overlaid from the mutation
    /// store and, when enabled in config, relevance-ranked. A pure read:
    /// the window itself is never reordered or mutated.
    pub fn items(&self) -> Vec<FeedItem> {
        let items = self.overlaid_items();
        if self.config.ranking.enabled {
            self.scorer.rank(&items, Utc::now())
        } else {
            items
        }
    }

    /// The current window in backend order, ignoring the ranking config
    pub fn items_unranked(&self) -> Vec<FeedItem> {
        self.overlaid_items()
    }

    pub fn is_loading(&self) -> bool {
        self.cursor.is_loading()
    }

    pub fn is_loading_more(&self) -> bool {
        self.cursor.is_loading_more()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_older()
    }

    /// The last initial/older fetch error, until the next attempt clears it
    pub fn error(&self) -> Option<FetchError> {
        self.cursor.last_error()
    }

    /// Number of detected-but-unmerged newer items
    pub fn new_item_count(&self) -> usize {
        self.merge.pending()
    }

    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    pub fn feed(&self) -> &FeedKind {
        self.cursor.feed()
    }

    // === Mutations ===

    /// Optimistically toggles the like state of an item
    pub async fn toggle_like(&self, id: &ItemId) -> Result<LikeState, MutationError> {
        self.mutations.toggle(id).await
    }

    /// Interactive state of one item, shared across all sessions
    pub fn like_state(&self, id: &ItemId) -> Option<LikeState> {
        self.mutations.read(id)
    }

    pub fn mutations(&self) -> &Arc<MutationStore> {
        &self.mutations
    }

    /// Seeds the mutation store from every item currently in the window.
    /// First writer wins, so re-hydrating after each load is idempotent.
    fn hydrate_mutations(&self) {
        for item in self.cursor.items() {
            self.mutations
                .initialize(item.id.clone(), false, item.counters.likes);
        }
    }

    fn overlaid_items(&self) -> Vec<FeedItem> {
        self.cursor
            .items()
            .into_iter()
            .map(|mut item| {
                if let Some(state) = self.mutations.read(&item.id) {
                    item.counters.likes = state.count;
                }
                item
            })
            .collect()
    }
}

impl std::fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSession")
            .field("feed", self.cursor.feed())
            .field("len", &self.cursor.len())
            .field("new_item_count", &self.merge.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::{descending_items, test_item_with_counters, ScriptedBackend};
    use crate::domain::feed::Counters;

    fn session_with(backend: Arc<ScriptedBackend>, config: FeedConfig) -> FeedSession {
        let store = Arc::new(MutationStore::new(Arc::clone(&backend) as Arc<dyn FeedBackend>));
        FeedSession::new(backend, FeedKind::Home, config, store)
    }

    fn ids(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_initial_hydrates_mutation_store() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(vec![test_item_with_counters(
            "p1",
            10,
            Counters {
                likes: 7,
                ..Counters::default()
            },
        )]);
        let session = session_with(backend, FeedConfig::default());

        session.load_initial().await.expect("initial");

        assert_eq!(
            session.like_state(&ItemId::new("p1")),
            Some(LikeState {
                is_liked: false,
                count: 7
            })
        );
    }

    #[tokio::test]
    async fn test_items_overlay_optimistic_like_counts() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(vec![test_item_with_counters(
            "p1",
            10,
            Counters {
                likes: 7,
                ..Counters::default()
            },
        )]);
        let session = session_with(backend, FeedConfig::default());
        session.load_initial().await.expect("initial");

        session
            .toggle_like(&ItemId::new("p1"))
            .await
            .expect("toggle");

        let items = session.items();
        assert_eq!(items[0].counters.likes, 8);
    }

    #[tokio::test]
    async fn test_ranking_config_reorders_reads_without_touching_window() {
        let backend = Arc::new(ScriptedBackend::new());
        // Items must be recent: ranking reads against wall-clock now, and
        // decades of decay would underflow every score to a 0.0 tie
        let now = Utc::now();
        // Newest-first page where the older item is far more engaging
        backend.push_page(vec![
            FeedItem::new("quiet", "tester", now, Counters::default()),
            FeedItem::new(
                "viral",
                "tester",
                now - chrono::Duration::minutes(10),
                Counters {
                    likes: 1000,
                    ..Counters::default()
                },
            ),
        ]);
        let config = FeedConfig {
            ranking: crate::config::RankingConfig {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let session = session_with(backend, config);
        session.load_initial().await.expect("initial");

        assert_eq!(ids(&session.items()), vec!["viral", "quiet"]);
        // The window itself keeps backend order
        assert_eq!(ids(&session.items_unranked()), vec!["quiet", "viral"]);
    }

    #[tokio::test]
    async fn test_refresh_drops_detected_items_and_reloads() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(descending_items(&["p5", "p4"], 50));
        backend.push_page(descending_items(&["p9", "p8"], 90));
        let session = session_with(backend, FeedConfig::default());

        session.load_initial().await.expect("initial");
        session
            .merge
            .on_detected(descending_items(&["n1"], 60));
        assert_eq!(session.new_item_count(), 1);

        session.refresh().await.expect("refresh");

        assert_eq!(session.new_item_count(), 0);
        assert_eq!(ids(&session.items()), vec!["p9", "p8"]);
    }

    #[tokio::test]
    async fn test_load_new_merges_and_hydrates() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(descending_items(&["p5"], 50));
        let session = session_with(backend, FeedConfig::default());
        session.load_initial().await.expect("initial");

        session.merge.on_detected(vec![test_item_with_counters(
            "n1",
            60,
            Counters {
                likes: 3,
                ..Counters::default()
            },
        )]);

        assert_eq!(session.load_new(), 1);
        assert_eq!(ids(&session.items()), vec!["n1", "p5"]);
        assert_eq!(
            session.like_state(&ItemId::new("n1")),
            Some(LikeState {
                is_liked: false,
                count: 3
            })
        );

        // Flushing again is a no-op
        assert_eq!(session.load_new(), 0);
    }

    #[tokio::test]
    async fn test_two_sessions_share_like_state() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(descending_items(&["p1"], 10));
        backend.push_page(descending_items(&["p1"], 10));

        let store = Arc::new(MutationStore::new(
            Arc::clone(&backend) as Arc<dyn FeedBackend>
        ));
        let home = FeedSession::new(
            Arc::clone(&backend) as Arc<dyn FeedBackend>,
            FeedKind::Home,
            FeedConfig::default(),
            Arc::clone(&store),
        );
        let author = FeedSession::new(
            Arc::clone(&backend) as Arc<dyn FeedBackend>,
            FeedKind::Author("tester".into()),
            FeedConfig::default(),
            store,
        );

        home.load_initial().await.expect("home initial");
        author.load_initial().await.expect("author initial");

        home.toggle_like(&ItemId::new("p1")).await.expect("toggle");

        assert_eq!(
            author.like_state(&ItemId::new("p1")).map(|s| s.is_liked),
            Some(true)
        );
        assert_eq!(author.items()[0].counters.likes, 1);
    }
}
