//! Time-decayed relevance scoring
//!
//! A pure read-time transform: scoring never mutates the window it reads.
//! Each ranking pass evaluates every item against a single shared `now` so
//! the ordering is a consistent total order for the whole pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::feed::FeedItem;

/// Engagement weights and decay half-life for [`RankingScorer`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub likes: f64,
    pub comments: f64,
    pub reposts: f64,
    pub views: f64,
    /// Age, in hours, at which an engagement score is reduced by half
    pub half_life_hours: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            likes: 1.0,
            comments: 2.0,
            reposts: 1.5,
            views: 0.01,
            half_life_hours: 24.0,
        }
    }
}

/// Scores items by engagement, decayed exponentially with age
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingScorer {
    weights: RankingWeights,
}

impl RankingScorer {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Relevance score of a single item at `now`.
    /// Non-increasing in age for fixed counters; items from the future are
    /// clamped to age zero rather than amplified.
    pub fn score(&self, item: &FeedItem, now: DateTime<Utc>) -> f64 {
        let age_secs = (now - item.created_at).num_seconds().max(0) as f64;
        let age_hours = age_secs / 3600.0;
        let decay = (-age_hours / self.weights.half_life_hours).exp();

        let c = &item.counters;
        let engagement = c.likes as f64 * self.weights.likes
            + c.comments as f64 * self.weights.comments
            + c.reposts as f64 * self.weights.reposts
            + c.views as f64 * self.weights.views;

        engagement * decay
    }

    /// Returns the items reordered by descending score.
    ///
    /// Scores are computed once per item before sorting, and the sort is
    /// stable: ties keep their original order, so ranking an already-ranked
    /// list is idempotent.
    pub fn rank(&self, items: &[FeedItem], now: DateTime<Utc>) -> Vec<FeedItem> {
        let mut scored: Vec<(f64, &FeedItem)> =
            items.iter().map(|item| (self.score(item, now), item)).collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(_, item)| item.clone()).collect()
    }
}
