//! The abstract backend contract the engine consumes
//!
//! The HTTP/REST client behind this trait is out of scope; the engine only
//! relies on the cursor-pagination and mutation semantics specified here.

use async_trait::async_trait;

use crate::domain::feed::{FeedItem, FeedKind, ItemId};
use crate::error::{FetchError, MutationFailure};

/// Exclusive cursor boundaries for one page fetch.
/// With neither boundary set, the backend returns the newest page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    /// Return only items strictly older than this id
    pub before: Option<ItemId>,
    /// Return only items strictly newer than this id
    pub after: Option<ItemId>,
}

impl PageRequest {
    pub fn newest(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn before(limit: usize, tail: ItemId) -> Self {
        Self {
            limit,
            before: Some(tail),
            ..Self::default()
        }
    }

    pub fn after(limit: usize, head: ItemId) -> Self {
        Self {
            limit,
            after: Some(head),
            ..Self::default()
        }
    }
}

/// Kind of interactive mutation applied to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum MutationKind {
    #[strum(serialize = "like")]
    Like,
}

/// Backend collaborator: cursor-paginated feed reads plus item mutations.
///
/// `fetch_page` returns items newest-first. The backend reports no total
/// counts; "has more" is inferred client-side from page fullness.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    async fn fetch_page(
        &self,
        feed: &FeedKind,
        request: &PageRequest,
    ) -> Result<Vec<FeedItem>, FetchError>;

    /// Apply or withdraw a mutation (e.g. `POST`/`DELETE /posts/:id/like`)
    async fn mutate(
        &self,
        id: &ItemId,
        kind: MutationKind,
        desired: bool,
    ) -> Result<(), MutationFailure>;
}
