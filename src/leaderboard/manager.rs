use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::board::{HighScoreEntry, Leaderboard};
use super::store::{ScoreStore, StoreError};

/// Keeps the in-memory leaderboard in step with the score store and the
/// local snapshot file.
pub struct LeaderboardManager {
    store: Arc<dyn ScoreStore>,
    snapshot_path: Option<PathBuf>,
    board: Leaderboard,
    /// Row inserted for the last game that is still waiting for a name
    pending: Option<usize>,
}

impl LeaderboardManager {
    /// Create a manager, seeding the board from the snapshot file if one exists
    pub fn new(store: Arc<dyn ScoreStore>, snapshot_path: Option<PathBuf>) -> Self {
        let board = match snapshot_path.as_deref() {
            Some(path) if path.exists() => Self::read_snapshot(path).unwrap_or_else(|e| {
                warn!("Ignoring unreadable leaderboard snapshot: {:#}", e);
                Leaderboard::new()
            }),
            _ => Leaderboard::new(),
        };

        Self {
            store,
            snapshot_path,
            board,
            pending: None,
        }
    }

    pub fn store(&self) -> Arc<dyn ScoreStore> {
        Arc::clone(&self.store)
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    /// Fetch the authoritative scores. On failure the current board is kept.
    pub async fn load(&mut self) -> Result<&Leaderboard, StoreError> {
        let entries = self.store.load_scores().await?;
        self.apply_loaded(entries);
        Ok(&self.board)
    }

    /// Replace the board with scores fetched from the store
    pub fn apply_loaded(&mut self, entries: Vec<HighScoreEntry>) {
        let fetched = entries.len();
        self.board = Leaderboard::from_entries(entries);
        self.pending = None;
        info!(fetched, shown = self.board.len(), "Leaderboard loaded");
    }

    /// Insert an unnamed row for a finished game. Returns the row if the score
    /// qualifies.
    pub fn record_score(&mut self, score: u32) -> Option<usize> {
        self.discard_pending();
        let index = self.board.insert(HighScoreEntry::new(String::new(), score));
        self.pending = index;
        index
    }

    /// Name the pending row and hand back the entry to submit
    pub fn name_pending(&mut self, raw_name: &str) -> Option<HighScoreEntry> {
        let index = self.pending.take()?;
        let name = HighScoreEntry::normalize_name(raw_name);
        self.board.rename(index, &name);
        self.board.entries().get(index).cloned()
    }

    /// Drop the pending row without saving it
    pub fn discard_pending(&mut self) {
        if let Some(index) = self.pending.take() {
            self.board.remove(index);
        }
    }

    /// Append one entry to the store
    pub async fn save(&self, entry: &HighScoreEntry) -> Result<(), StoreError> {
        self.store.append_score(entry).await
    }

    /// Write the board to the snapshot file, if one is configured
    pub fn write_snapshot(&self) -> Result<()> {
        let Some(path) = self.snapshot_path.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(self.board.entries())
            .context("Failed to serialize leaderboard")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write leaderboard snapshot to {:?}", path))?;

        Ok(())
    }

    /// Read a snapshot written by [`LeaderboardManager::write_snapshot`]
    pub fn read_snapshot(path: &Path) -> Result<Leaderboard> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read leaderboard snapshot from {:?}", path))?;
        let entries: Vec<HighScoreEntry> =
            serde_json::from_str(&json).context("Failed to parse leaderboard snapshot")?;
        Ok(Leaderboard::from_entries(entries))
    }
}
