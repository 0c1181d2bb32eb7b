//! Browser side of the leaderboard
//!
//! Failures never reach the game loop. They turn into a short message on
//! the game-over screen and the last good list stays visible.

use std::fmt;

use serde_json::{Value, json};

use super::{Leaderboard, MAX_HIGH_SCORES, ScoreEntry};

pub const LOAD_FAILED: &str = "Failed to load leaderboard";
pub const SUBMIT_FAILED: &str = "Failed to submit score";

/// Which leaderboard call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureCause {
    /// Request never completed
    Network(String),
    /// Server answered with an unexpected status
    Status(u16),
    /// Body was not what the contract promises
    Malformed(String),
    /// Rejected before sending
    InvalidSubmission(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardError {
    pub op: Operation,
    pub cause: FailureCause,
}

impl LeaderboardError {
    fn fetch(cause: FailureCause) -> Self {
        Self {
            op: Operation::Fetch,
            cause,
        }
    }

    fn submit(cause: FailureCause) -> Self {
        Self {
            op: Operation::Submit,
            cause,
        }
    }

    /// Text shown to the player
    pub fn user_message(&self) -> &'static str {
        match self.op {
            Operation::Fetch => LOAD_FAILED,
            Operation::Submit => SUBMIT_FAILED,
        }
    }
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.user_message())?;
        match &self.cause {
            FailureCause::Network(msg) => write!(f, "network error: {}", msg),
            FailureCause::Status(code) => write!(f, "HTTP {}", code),
            FailureCause::Malformed(msg) => write!(f, "malformed response: {}", msg),
            FailureCause::InvalidSubmission(why) => write!(f, "{}", why),
        }
    }
}

impl std::error::Error for LeaderboardError {}

/// Decode a `GET` response
///
/// Anything other than a 200 with a JSON array of entries is a failure.
pub fn parse_top_scores(status: u16, body: &str) -> Result<Vec<ScoreEntry>, LeaderboardError> {
    if status != 200 {
        return Err(LeaderboardError::fetch(FailureCause::Status(status)));
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| LeaderboardError::fetch(FailureCause::Malformed(e.to_string())))?;
    if !value.is_array() {
        return Err(LeaderboardError::fetch(FailureCause::Malformed(
            "expected a JSON array".to_string(),
        )));
    }
    let entries: Vec<ScoreEntry> = serde_json::from_value(value)
        .map_err(|e| LeaderboardError::fetch(FailureCause::Malformed(e.to_string())))?;
    // Display order is always score-descending
    Ok(Leaderboard::from_entries(entries, MAX_HIGH_SCORES).entries)
}

/// Build a `POST` body, rejecting blank names up front
pub fn submission_body(score: i64, name: &str) -> Result<String, LeaderboardError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeaderboardError::submit(FailureCause::InvalidSubmission(
            "name is empty",
        )));
    }
    Ok(json!({ "score": score, "name": name }).to_string())
}

/// Decode a `POST` response
pub fn check_submit_response(status: u16) -> Result<(), LeaderboardError> {
    if status == 201 {
        Ok(())
    } else {
        Err(LeaderboardError::submit(FailureCause::Status(status)))
    }
}

/// What the game-over screen shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardView {
    pub board: Leaderboard,
    /// Transient status line ("Failed to load leaderboard", "Score saved!")
    pub message: Option<String>,
    pub loading: bool,
    /// Set once this round's score was accepted
    pub submitted: bool,
}

impl LeaderboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Replace entries on success; keep the stale list on failure
    pub fn apply_fetch(&mut self, result: Result<Vec<ScoreEntry>, LeaderboardError>) {
        self.loading = false;
        match result {
            Ok(entries) => {
                self.board = Leaderboard::from_entries(entries, MAX_HIGH_SCORES);
                self.message = None;
            }
            Err(e) => {
                log::warn!("{}", e);
                self.message = Some(e.user_message().to_string());
            }
        }
    }

    pub fn apply_submit(&mut self, result: Result<(), LeaderboardError>) {
        match result {
            Ok(()) => {
                self.submitted = true;
                self.message = Some("Score saved!".to_string());
            }
            Err(e) => {
                log::warn!("{}", e);
                self.message = Some(e.user_message().to_string());
            }
        }
    }

    /// Rank a final score would earn on the current list
    pub fn rank_for(&self, score: i64) -> Option<usize> {
        self.board.potential_rank(score as f64)
    }

    /// New round, fresh form (entries stay for the next game over)
    pub fn reset_round(&mut self) {
        self.message = None;
        self.submitted = false;
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::*;

    fn network(op: Operation, err: JsValue) -> LeaderboardError {
        let msg = err.as_string().unwrap_or_else(|| format!("{:?}", err));
        LeaderboardError {
            op,
            cause: FailureCause::Network(msg),
        }
    }

    async fn send(op: Operation, request: &Request) -> Result<(u16, String), LeaderboardError> {
        let window = web_sys::window()
            .ok_or_else(|| network(op, JsValue::from_str("no window")))?;
        let value = JsFuture::from(window.fetch_with_request(request))
            .await
            .map_err(|e| network(op, e))?;
        let response: Response = value.dyn_into().map_err(|e| network(op, e))?;
        let text = JsFuture::from(response.text().map_err(|e| network(op, e))?)
            .await
            .map_err(|e| network(op, e))?;
        Ok((response.status(), text.as_string().unwrap_or_default()))
    }

    /// `GET` the top scores
    pub async fn fetch_top(endpoint: &str) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let op = Operation::Fetch;
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_mode(RequestMode::SameOrigin);
        let request =
            Request::new_with_str_and_init(endpoint, &init).map_err(|e| network(op, e))?;

        let (status, body) = send(op, &request).await?;
        parse_top_scores(status, &body)
    }

    /// `POST` one score
    pub async fn submit_score(endpoint: &str, score: i64, name: &str) -> Result<(), LeaderboardError> {
        let op = Operation::Submit;
        let body = submission_body(score, name)?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::SameOrigin);
        init.set_body(&JsValue::from_str(&body));
        let request =
            Request::new_with_str_and_init(endpoint, &init).map_err(|e| network(op, e))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| network(op, e))?;

        let (status, _) = send(op, &request).await?;
        check_submit_response(status)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{fetch_top, submit_score};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::entry;

    #[test]
    fn test_parse_good_list() {
        let body = serde_json::to_string(&vec![entry(3, "b"), entry(9, "a")]).unwrap();
        let entries = parse_top_scores(200, &body).unwrap();
        assert_eq!(entries[0].name, "a");
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_non_array_is_fetch_failure() {
        let err = parse_top_scores(200, r#"{"error": "Failed to fetch scores"}"#).unwrap_err();
        assert_eq!(err.op, Operation::Fetch);
        assert!(matches!(err.cause, FailureCause::Malformed(_)));
        assert_eq!(err.user_message(), LOAD_FAILED);

        let err = parse_top_scores(500, "{}").unwrap_err();
        assert_eq!(err.cause, FailureCause::Status(500));
    }

    #[test]
    fn test_submission_body() {
        let body = submission_body(-8, "  Ann ").unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "score": -8, "name": "Ann" }));

        let err = submission_body(10, "   ").unwrap_err();
        assert_eq!(err.user_message(), SUBMIT_FAILED);
        assert!(check_submit_response(201).is_ok());
        assert!(check_submit_response(400).is_err());
    }

    #[test]
    fn test_view_keeps_stale_entries_on_failure() {
        let mut view = LeaderboardView::new();
        view.begin_fetch();
        view.apply_fetch(Ok(vec![entry(40, "a"), entry(20, "b")]));
        assert!(!view.loading);
        assert_eq!(view.board.entries.len(), 2);
        assert_eq!(view.rank_for(30), Some(2));

        view.begin_fetch();
        view.apply_fetch(parse_top_scores(200, "\"oops\""));
        assert_eq!(view.board.entries.len(), 2);
        assert_eq!(view.message.as_deref(), Some(LOAD_FAILED));

        view.apply_submit(check_submit_response(500));
        assert!(!view.submitted);
        assert_eq!(view.message.as_deref(), Some(SUBMIT_FAILED));

        view.apply_submit(Ok(()));
        assert!(view.submitted);
        view.reset_round();
        assert!(!view.submitted);
        assert!(view.message.is_none());
        assert_eq!(view.board.entries.len(), 2);
    }
}
