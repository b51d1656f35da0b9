//! Core game logic module for Snake
//!
//! This module contains the simulation without any rendering dependencies:
//! grid geometry, the tick engine and the fixed-cadence loop that drives it.

pub mod action;
pub mod config;
pub mod driver;
pub mod engine;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, NextMove};
pub use config::{BoundaryPolicy, GameConfig};
pub use driver::{DriverPhase, GameListener, GameLoopDriver, LoopOutcome};
pub use engine::{GameSnapshot, SnakeEngine, TickOutcome};
pub use grid::GridModel;
pub use state::{Cell, CollisionType, ColorTag, Fruit, GameState, Position, Snake};
