//! Grid Snake - a terminal snake game with a top-10 leaderboard
//!
//! This library provides:
//! - Core game logic and the timed tick loop (game module)
//! - Buffered direction input shared with the tick loop (input module)
//! - Leaderboard ranking and score stores (leaderboard module)
//! - TUI rendering (render module)
//! - The interactive terminal mode (modes module)

pub mod config;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod logging;
pub mod modes;
pub mod render;
