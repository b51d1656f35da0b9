//! Score store adapters
//!
//! The game only needs two operations from wherever scores live: fetch
//! everything that was saved, and append one entry. [`ScoreStore`] captures
//! that seam; the HTTP adapter talks to the high-score service, the file
//! adapter keeps scores locally for offline play.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Response};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use super::board::HighScoreEntry;

/// Path of the high-score resource on the service
pub const HIGH_SCORES_PATH: &str = "/HighScores";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("score service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("score file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed score data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where high scores are persisted.
///
/// `load_scores` returns whatever was previously appended, in no particular
/// order and possibly more than a leaderboard's worth.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn load_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError>;

    async fn append_score(&self, entry: &HighScoreEntry) -> Result<(), StoreError>;
}

/// Client for the high-score HTTP service
pub struct HttpScoreStore {
    client: Client,
    endpoint: String,
}

impl HttpScoreStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), HIGH_SCORES_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScoreStore for HttpScoreStore {
    async fn load_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        debug!("GET {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;

        Ok(response.json::<Vec<HighScoreEntry>>().await?)
    }

    async fn append_score(&self, entry: &HighScoreEntry) -> Result<(), StoreError> {
        debug!("POST {} ({} / {})", self.endpoint, entry.name, entry.score);

        let response = self.client.post(&self.endpoint).json(entry).send().await?;
        ensure_success(response).await?;

        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Keeps every appended score in a local JSON file
pub struct JsonFileScoreStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ScoreStore for JsonFileScoreStore {
    async fn load_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        self.read_all().await
    }

    async fn append_score(&self, entry: &HighScoreEntry) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_all().await?;
        entries.push(entry.clone());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, json).await?;

        Ok(())
    }
}

/// In-process store, handy for tests and demos
#[derive(Default)]
pub struct MemoryScoreStore {
    entries: Mutex<Vec<HighScoreEntry>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HighScoreEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn load_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn append_score(&self, entry: &HighScoreEntry) -> Result<(), StoreError> {
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request with a canned HTTP response and return the base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_http_endpoint() {
        let store = HttpScoreStore::new("https://localhost:7089/").unwrap();
        assert_eq!(store.endpoint(), "https://localhost:7089/HighScores");

        let store = HttpScoreStore::new("http://scores.local").unwrap();
        assert_eq!(store.endpoint(), "http://scores.local/HighScores");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let base = serve_once("503 Service Unavailable", "down").await;
        let store = HttpScoreStore::new(&base).unwrap();

        match store.load_scores().await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_load_scores() {
        let base = serve_once("200 OK", r#"[{"id":"1","name":"ALICE","score":12}]"#).await;
        let store = HttpScoreStore::new(&base).unwrap();

        let entries = store.load_scores().await.unwrap();
        assert_eq!(entries, vec![HighScoreEntry::new("ALICE", 12)]);
    }

    #[tokio::test]
    async fn test_http_append_rejected() {
        let base = serve_once("500 Internal Server Error", "").await;
        let store = HttpScoreStore::new(&base).unwrap();

        let result = store.append_score(&HighScoreEntry::new("BOB", 3)).await;
        assert!(matches!(result, Err(StoreError::Status { status: 500, .. })));
    }

    #[test]
    fn test_service_payload_parses() {
        // The service includes a document id we do not care about
        let json = r#"[{"id":"65a1","name":"ALICE","score":12},{"id":"65a2","score":3}]"#;
        let entries: Vec<HighScoreEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0], HighScoreEntry::new("ALICE", 12));
        assert_eq!(entries[1], HighScoreEntry::new("", 3));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryScoreStore::new();
        store.append_score(&HighScoreEntry::new("A", 5)).await.unwrap();
        store.append_score(&HighScoreEntry::new("B", 9)).await.unwrap();

        let entries = store.load_scores().await.unwrap();
        assert_eq!(
            entries,
            vec![HighScoreEntry::new("A", 5), HighScoreEntry::new("B", 9)]
        );
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileScoreStore::new(dir.path().join("scores.json"));

        assert!(store.load_scores().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("scores.json");
        let store = JsonFileScoreStore::new(&path);

        store.append_score(&HighScoreEntry::new("ALICE", 40)).await.unwrap();
        store.append_score(&HighScoreEntry::new("BOB", 25)).await.unwrap();

        // A fresh handle sees the same data
        let reopened = JsonFileScoreStore::new(&path);
        let entries = reopened.load_scores().await.unwrap();
        assert_eq!(
            entries,
            vec![HighScoreEntry::new("ALICE", 40), HighScoreEntry::new("BOB", 25)]
        );
    }

    #[tokio::test]
    async fn test_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileScoreStore::new(&path);
        assert!(matches!(store.load_scores().await, Err(StoreError::Json(_))));
    }
}
