//! Top-10 high-score leaderboard
//!
//! Ranking logic lives in [`board`], persistence adapters in [`store`], and
//! [`manager`] ties the two together with the on-disk snapshot.

pub mod board;
pub mod manager;
pub mod store;

pub use board::{HighScoreEntry, Leaderboard, LEADERBOARD_CAPACITY, MAX_NAME_LEN};
pub use manager::LeaderboardManager;
pub use store::{HttpScoreStore, JsonFileScoreStore, MemoryScoreStore, ScoreStore, StoreError};
