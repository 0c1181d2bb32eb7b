//! HTTP wiring for the leaderboard service
//!
//! The store is built once in `main` and shared through router state.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use serde_json::json;

use super::service::{ApiResponse, LeaderboardService, STATUS_SERVER_ERROR};
use super::store::{JsonFileStore, MemoryStore, ScoreStore, StoreError};

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Server configuration from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    /// JSON score file; memory store when unset
    pub score_file: Option<PathBuf>,
}

impl ServerConfig {
    /// `LEADERBOARD_ADDR` and `LEADERBOARD_FILE`
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("LEADERBOARD_ADDR").ok(),
            std::env::var("LEADERBOARD_FILE").ok(),
        )
    }

    fn from_vars(addr: Option<String>, file: Option<String>) -> Self {
        Self {
            addr: addr
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            score_file: file.filter(|f| !f.trim().is_empty()).map(PathBuf::from),
        }
    }

    /// Build the one store the process will use
    pub fn open_store(&self) -> Result<Arc<dyn ScoreStore>, StoreError> {
        match &self.score_file {
            Some(path) => Ok(Arc::new(JsonFileStore::open(path)?)),
            None => {
                log::warn!("LEADERBOARD_FILE not set, scores kept in memory only");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

pub fn router(service: LeaderboardService) -> Router {
    Router::new()
        .route("/api/leaderboard", get(list_scores).post(submit_score))
        .with_state(Arc::new(service))
}

/// Run a service call on the blocking pool (file stores write under a lock)
async fn blocking<F>(call: F) -> ApiResponse
where
    F: FnOnce() -> ApiResponse + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Leaderboard task failed: {}", e);
            ApiResponse {
                status: STATUS_SERVER_ERROR,
                body: json!({ "error": "Internal server error" }),
            }
        }
    }
}

async fn list_scores(State(service): State<Arc<LeaderboardService>>) -> ApiResponse {
    blocking(move || service.list()).await
}

async fn submit_score(State(service): State<Arc<LeaderboardService>>, body: Bytes) -> ApiResponse {
    blocking(move || service.submit(&body)).await
}

/// Bind and serve until the process exits
pub async fn serve(config: &ServerConfig, service: LeaderboardService) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    let local: SocketAddr = listener.local_addr()?;
    log::info!("Leaderboard listening on http://{}/api/leaderboard", local);
    axum::serve(listener, router(service)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn request(addr: SocketAddr, raw: String) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    fn post(body: &str) -> String {
        format!(
            "POST /api/leaderboard HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[test]
    fn test_config_from_vars() {
        let config = ServerConfig::from_vars(None, Some("  ".into()));
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.score_file, None);

        let config = ServerConfig::from_vars(Some("0.0.0.0:8080".into()), Some("scores.json".into()));
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.score_file, Some(PathBuf::from("scores.json")));
    }

    #[tokio::test]
    async fn test_round_trip_over_http() {
        let service = LeaderboardService::new(Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(service)).await;
        });

        let resp = request(addr, post(r#"{"score": 120, "name": "  Ann  "}"#)).await;
        assert!(resp.starts_with("HTTP/1.1 201"), "{}", resp);
        assert!(resp.contains("Score saved"));

        let resp = request(addr, post(r#"{"score": "x", "name": "Bo"}"#)).await;
        assert!(resp.starts_with("HTTP/1.1 400"), "{}", resp);

        let get = "GET /api/leaderboard HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
        let resp = request(addr, get.to_string()).await;
        assert!(resp.starts_with("HTTP/1.1 200"), "{}", resp);
        assert!(resp.contains(r#""name":"Ann""#));
        assert!(resp.contains(r#""score":120"#));
    }

    #[tokio::test]
    async fn test_file_store_writes_through_http() {
        let path = std::env::temp_dir().join(format!(
            "nutrition_hunter_http_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let config = ServerConfig::from_vars(None, Some(path.display().to_string()));
        let service = LeaderboardService::new(config.open_store().unwrap());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(service)).await;
        });

        let resp = request(addr, post(r#"{"score": 7.5, "name": "Dee"}"#)).await;
        assert!(resp.starts_with("HTTP/1.1 201"), "{}", resp);

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("Dee"));
        assert!(saved.contains("7.5"));

        let _ = std::fs::remove_file(&path);
    }
}
