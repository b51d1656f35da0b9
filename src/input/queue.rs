use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::game::{Direction, GameConfig, NextMove};

#[derive(Debug)]
struct QueueState {
    moves: VecDeque<NextMove>,
    /// Direction the engine applied on the last tick
    committed: Direction,
    snake_len: usize,
}

/// Bounded FIFO of direction changes shared between the input side and the
/// tick loop.
///
/// Clones share the same queue. The engine publishes its committed direction
/// and snake length after every tick so reversals can be rejected at enqueue
/// time.
#[derive(Debug, Clone)]
pub struct InputQueue {
    state: Arc<Mutex<QueueState>>,
    cell_size: i32,
    capacity: usize,
}

impl InputQueue {
    pub fn new(cell_size: i32, capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                moves: VecDeque::with_capacity(capacity),
                committed: Direction::Down,
                snake_len: 1,
            })),
            cell_size,
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.cell_size, config.input_queue_capacity)
    }

    /// Queue a direction change. Returns false when the input was dropped.
    pub fn enqueue(&self, direction: Direction) -> bool {
        let mut state = self.lock();

        if state.snake_len > 2 && state.committed.is_opposite(direction) {
            trace!(?direction, committed = ?state.committed, "Reversal rejected");
            return false;
        }

        if state.moves.len() >= self.capacity {
            trace!(?direction, "Input queue full, dropping move");
            return false;
        }

        state.moves.push_back(NextMove::new(direction, self.cell_size));
        true
    }

    /// Queue a raw arrow key code; codes outside 37-40 are ignored
    pub fn enqueue_key_code(&self, code: u32) -> bool {
        match Direction::from_key_code(code) {
            Some(direction) => self.enqueue(direction),
            None => false,
        }
    }

    /// Pop the oldest queued move
    pub fn dequeue_one(&self) -> Option<NextMove> {
        self.lock().moves.pop_front()
    }

    /// Record the direction and length the engine ended the tick with
    pub fn commit(&self, direction: Direction, snake_len: usize) {
        let mut state = self.lock();
        state.committed = direction;
        state.snake_len = snake_len;
    }

    pub fn committed(&self) -> Direction {
        self.lock().committed
    }

    /// Drop all pending moves and start over heading `direction`
    pub fn reset(&self, direction: Direction) {
        let mut state = self.lock();
        state.moves.clear();
        state.committed = direction;
        state.snake_len = 1;
    }

    pub fn len(&self) -> usize {
        self.lock().moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().moves.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
