use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{
    config::GameConfig,
    engine::{SnakeEngine, TickOutcome},
    state::CollisionType,
};
use crate::input::InputQueue;

/// Callbacks fired by the tick loop
pub trait GameListener: Send {
    /// Called once with the freshly reset board, before the first tick
    fn on_start(&mut self, _engine: &SnakeEngine) {}

    /// Called after every tick that moved the snake
    fn on_refresh(&mut self, engine: &SnakeEngine);

    /// Called once when a collision ends the game; never on cancellation
    fn on_game_over(&mut self, final_score: u32);
}

/// Where the driver is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    Running,
    GameOver,
}

/// How a call to [`GameLoopDriver::play`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    GameOver {
        score: u32,
        cause: Option<CollisionType>,
    },
    Cancelled,
}

/// Runs a [`SnakeEngine`] on a fixed cadence until game over or cancellation
pub struct GameLoopDriver {
    engine: SnakeEngine,
    phase: DriverPhase,
}

impl GameLoopDriver {
    pub fn new(config: GameConfig, queue: InputQueue) -> Self {
        Self::with_engine(SnakeEngine::new(config, queue))
    }

    pub fn with_engine(engine: SnakeEngine) -> Self {
        Self {
            engine,
            phase: DriverPhase::Idle,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn engine(&self) -> &SnakeEngine {
        &self.engine
    }

    /// Reset the board and tick until the game ends or `cancel` fires.
    ///
    /// The sleep between ticks is re-read from the engine on every iteration,
    /// so the game speeds up as fruit is eaten.
    pub async fn play<L>(&mut self, listener: &mut L, cancel: &CancellationToken) -> LoopOutcome
    where
        L: GameListener + ?Sized,
    {
        self.engine.reset();
        self.phase = DriverPhase::Running;
        info!(
            grid_cells = self.engine.grid().cells(),
            speed_ms = self.engine.state().speed_ms,
            "Game started"
        );
        listener.on_start(&self.engine);

        loop {
            let delay = Duration::from_millis(self.engine.state().speed_ms);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.phase = DriverPhase::Idle;
                    info!(score = self.engine.state().score, "Game cancelled");
                    return LoopOutcome::Cancelled;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let outcome = self.engine.tick();
            if !outcome.is_over() {
                listener.on_refresh(&self.engine);
                continue;
            }

            let cause = match outcome {
                TickOutcome::Collided(cause) => Some(cause),
                _ => None,
            };
            let score = self.engine.state().score;

            self.phase = DriverPhase::GameOver;
            info!(score, ?cause, length = self.engine.snake().len(), "Game over");
            listener.on_game_over(score);

            return LoopOutcome::GameOver { score, cause };
        }
    }

    /// Leave the game-over screen
    pub fn return_to_menu(&mut self) {
        if self.phase == DriverPhase::GameOver {
            self.phase = DriverPhase::Idle;
        }
    }
}
