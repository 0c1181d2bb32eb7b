//! High score leaderboard
//!
//! Shared types for both ends of `/api/leaderboard`:
//! - `store`: where entries live (memory or a JSON file)
//! - `service`: request validation and status codes, framework-free
//! - `server`: axum wiring (native only)
//! - `client`: the browser side, tolerant of failures

pub mod client;
pub mod service;
pub mod store;

#[cfg(not(target_arch = "wasm32"))]
pub mod server;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

pub use client::{LeaderboardError, LeaderboardView};
pub use service::{ApiResponse, LeaderboardService};
pub use store::{JsonFileStore, MemoryStore, ScoreStore, StoreError};

/// Maximum number of high scores served
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Any JSON number, echoed back as it was sent (`120` stays `120`)
    pub score: Number,
    /// Trimmed player name
    pub name: String,
    /// Stamped by the server when stored
    pub date: DateTime<Utc>,
}

impl ScoreEntry {
    /// Score as a float for ranking
    pub fn score_value(&self) -> f64 {
        self.score.as_f64().unwrap_or(0.0)
    }
}

/// Top-N view over entries, sorted descending by score
///
/// Ties keep arrival order, so an older entry outranks a newer equal score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Rank arbitrary entries (in arrival order) and keep the top `limit`
    pub fn from_entries(mut entries: Vec<ScoreEntry>, limit: usize) -> Self {
        // Stable sort keeps arrival order among equal scores
        entries.sort_by(|a, b| b.score_value().total_cmp(&a.score_value()));
        entries.truncate(limit);
        Self { entries }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: f64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries
            .last()
            .map(|e| score > e.score_value())
            .unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score_value());
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }
}

#[cfg(test)]
pub(crate) fn entry(score: i64, name: &str) -> ScoreEntry {
    ScoreEntry {
        score: Number::from(score),
        name: name.to_string(),
        date: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
    }
}
