//! # Feedsync - Feed Synchronization & Optimistic Mutation Engine
//!
//! State-consistency logic for social feed clients: a paginated,
//! continuously-updating window of posts that survives pagination races,
//! duplicate network responses, optimistic UI under network failure, and
//! periodic re-polling.
//!
//! ## Architecture Overview
//!
//! - **[`model::timeline::TimelineCursor`]**: one ordered window per feed
//!   view; initial load, backward pagination, forward detection
//! - **[`model::merge::MergeController`]**: buffers detected newer items
//!   until the user asks to see them
//! - **[`infrastructure::poll::PollScheduler`]**: timer-driven forward
//!   checks with generation-counter cancellation
//! - **[`repositories::mutation::MutationStore`]**: process-wide optimistic
//!   like state with exact rollback
//! - **[`domain::ranking::RankingScorer`]**: pure read-time relevance
//!   scoring with exponential age decay
//! - **[`session::FeedSession`]**: the per-view facade a UI renders from
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use feedsync::backend::FeedBackend;
//! use feedsync::config::FeedConfig;
//! use feedsync::domain::feed::FeedKind;
//! use feedsync::repositories::mutation::MutationStore;
//! use feedsync::session::FeedSession;
//!
//! # async fn run(backend: Arc<dyn FeedBackend>) -> feedsync::Result<()> {
//! let store = Arc::new(MutationStore::new(Arc::clone(&backend)));
//! let session = FeedSession::new(backend, FeedKind::Home, FeedConfig::default(), store);
//!
//! session.load_initial().await?;
//! session.start_polling();
//!
//! // Render session.items(); later, on scroll:
//! session.load_more().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Guarantees
//!
//! - **Uniqueness**: an item id appears in a window at most once, whatever
//!   sequence of loads and merges produced it
//! - **Order preservation**: the engine never reorders what the backend
//!   returned; ranking is a read-time transform
//! - **Exactly-once mutations**: one in-flight toggle per item, rejected
//!   (not queued) when busy, rolled back exactly on failure

#![deny(warnings)]
#![allow(dead_code)]

pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod model;
pub mod repositories;
pub mod session;
pub mod test_helpers;
pub mod utils;

// Re-exports for convenience
pub use backend::{FeedBackend, MutationKind, PageRequest};
pub use config::FeedConfig;
pub use domain::feed::{AuthorId, Counters, FeedItem, FeedKind, ItemId};
pub use error::{FetchError, MutationError, MutationFailure};
pub use session::FeedSession;

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
