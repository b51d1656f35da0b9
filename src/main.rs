use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use grid_snake::config::AppConfig;
use grid_snake::game::BoundaryPolicy;
use grid_snake::leaderboard::{HttpScoreStore, JsonFileScoreStore, LeaderboardManager, ScoreStore};
use grid_snake::logging;
use grid_snake::modes::HumanMode;
use tracing::info;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a square grid with a top-10 leaderboard")]
struct Cli {
    /// TOML config file (missing file means defaults)
    #[arg(long, default_value = "grid_snake.toml")]
    config: PathBuf,

    /// Cells per side of the grid
    #[arg(long)]
    grid_cells: Option<i32>,

    /// Wrap around the edges instead of dying on the wall
    #[arg(long)]
    wrap: bool,

    /// Base URL of the high-score service
    #[arg(long)]
    server: Option<String>,

    /// Keep scores in the local file even if a server is configured
    #[arg(long)]
    offline: bool,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(cells) = cli.grid_cells {
        config.game.grid_cells = cells;
    }
    if cli.wrap {
        config.game.boundary = BoundaryPolicy::Wrap;
    }
    if let Some(server) = cli.server {
        config.leaderboard.server_url = Some(server);
    }
    if cli.offline {
        config.leaderboard.server_url = None;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = log_file;
    }

    logging::init(&config.log_file)?;

    let store: Arc<dyn ScoreStore> = match config.leaderboard.server_url.as_deref() {
        Some(url) => {
            info!(url, "Using remote leaderboard");
            Arc::new(HttpScoreStore::new(url)?)
        }
        None => {
            info!(path = ?config.leaderboard.scores_file, "Using local leaderboard");
            Arc::new(JsonFileScoreStore::new(config.leaderboard.scores_file.clone()))
        }
    };

    let leaderboard = LeaderboardManager::new(store, config.leaderboard.snapshot_path.clone());

    let mut human_mode = HumanMode::new(config.game, leaderboard);
    human_mode.run().await?;

    Ok(())
}
