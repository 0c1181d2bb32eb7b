//! `/api/leaderboard` request handling
//!
//! Kept free of any HTTP framework: handlers take raw bodies and return a
//! status plus a JSON body, which `server` turns into real responses.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Number, Value, json};

use super::store::ScoreStore;
use super::{MAX_HIGH_SCORES, ScoreEntry};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Status code and JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Leaderboard endpoint logic over an injected store
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn ScoreStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self { store }
    }

    /// `GET`: top 10, highest first
    pub fn list(&self) -> ApiResponse {
        let entries = match self.store.top(MAX_HIGH_SCORES) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Error fetching scores: {}", e);
                return ApiResponse::error(STATUS_SERVER_ERROR, "Failed to fetch scores");
            }
        };
        match serde_json::to_value(&entries) {
            Ok(body) => ApiResponse {
                status: STATUS_OK,
                body,
            },
            Err(e) => {
                log::error!("Error encoding scores: {}", e);
                ApiResponse::error(STATUS_SERVER_ERROR, "Failed to fetch scores")
            }
        }
    }

    /// `POST`: store `{score, name}` stamped with the current time
    pub fn submit(&self, body: &[u8]) -> ApiResponse {
        self.submit_at(body, Utc::now())
    }

    pub fn submit_at(&self, body: &[u8], now: DateTime<Utc>) -> ApiResponse {
        let (score, name) = match parse_submission(body) {
            Some(valid) => valid,
            None => return ApiResponse::error(STATUS_BAD_REQUEST, "Invalid score or name"),
        };

        let entry = ScoreEntry {
            score: score.clone(),
            name,
            date: now,
        };
        match self.store.insert(entry) {
            Ok(()) => {
                log::info!("Score saved: {}", score);
                ApiResponse {
                    status: STATUS_CREATED,
                    body: json!({ "message": "Score saved" }),
                }
            }
            Err(e) => {
                log::error!("Error saving score: {}", e);
                ApiResponse::error(STATUS_SERVER_ERROR, "Failed to save score")
            }
        }
    }
}

/// Validate a submission body into `(score, trimmed name)`
///
/// The score may be any JSON number; the name must be a string that is not
/// blank after trimming.
pub fn parse_submission(body: &[u8]) -> Option<(Number, String)> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let score = match value.get("score")? {
        Value::Number(n) => n.clone(),
        _ => return None,
    };
    let name = value.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    Some((score, name.to_string()))
}
