//! Core feed value types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque stable post identifier, unique within a backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque author identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorId(String);

impl AuthorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AuthorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Engagement counters as reported by the backend.
/// Non-negative by construction; the engine only ever adjusts `likes`,
/// and only through the mutation store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub reposts: u64,
    #[serde(default)]
    pub views: u64,
}

/// One post as known to a feed window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: ItemId,
    pub author_id: AuthorId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub counters: Counters,
}

impl FeedItem {
    pub fn new(
        id: impl Into<ItemId>,
        author_id: impl Into<AuthorId>,
        created_at: DateTime<Utc>,
        counters: Counters,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            created_at,
            counters,
        }
    }
}

/// Which feed a window shows
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display)]
pub enum FeedKind {
    /// Home timeline (the viewer's aggregate feed)
    #[strum(serialize = "home")]
    Home,
    /// A single author's posts
    #[strum(serialize = "author")]
    Author(AuthorId),
}
