use serde::{Deserialize, Serialize};

/// Shortest tick interval the loop will ever sleep
pub const MIN_TICK_MS: u64 = 1;

/// What happens when the head leaves the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Leaving the grid ends the game
    #[default]
    Walls,
    /// The head reappears on the opposite edge
    Wrap,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each side of the (square) grid
    pub grid_cells: i32,
    /// Size of one cell in pixel units
    pub cell_size: i32,
    /// Tick interval at the start of a game
    pub initial_speed_ms: u64,
    /// How much the tick interval shrinks per fruit eaten
    pub speed_decrement_ms: u64,
    /// Lower bound for the tick interval
    pub min_speed_ms: u64,
    pub boundary: BoundaryPolicy,
    /// Maximum number of buffered direction changes
    pub input_queue_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_cells: 20,
            cell_size: 10,
            initial_speed_ms: 200,
            speed_decrement_ms: 2,
            min_speed_ms: 40,
            boundary: BoundaryPolicy::Walls,
            input_queue_capacity: 16,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_cells: i32) -> Self {
        Self {
            grid_cells,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Lift tick intervals to at least [`MIN_TICK_MS`] so a zero from a
    /// config file cannot turn the loop into a busy spin
    pub fn clamped(mut self) -> Self {
        self.min_speed_ms = self.min_speed_ms.max(MIN_TICK_MS);
        self.initial_speed_ms = self.initial_speed_ms.max(MIN_TICK_MS);
        self
    }
}
