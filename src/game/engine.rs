use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use super::{
    action::{Direction, NextMove},
    config::{BoundaryPolicy, GameConfig, MIN_TICK_MS},
    grid::GridModel,
    state::{Cell, CollisionType, Fruit, GameState, Position, Snake},
};
use crate::input::InputQueue;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved one cell
    Moved { ate_fruit: bool },
    /// The game ended on this tick
    Collided(CollisionType),
    /// The game had already ended; nothing changed
    AlreadyOver,
}

impl TickOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, TickOutcome::Moved { .. })
    }
}

/// Owned copy of everything the UI needs to draw a frame
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub grid: GridModel,
    pub snake: Vec<Cell>,
    pub fruit: Fruit,
    pub state: GameState,
    pub direction: Direction,
}

/// The tick engine. Owns the snake, the fruit and the score for one game.
pub struct SnakeEngine {
    config: GameConfig,
    grid: GridModel,
    queue: InputQueue,
    rng: StdRng,
    snake: Snake,
    direction: Direction,
    fruit: Fruit,
    state: GameState,
}

impl SnakeEngine {
    /// Create an engine reading moves from `queue`
    pub fn new(config: GameConfig, queue: InputQueue) -> Self {
        Self::with_rng(config, queue, StdRng::from_entropy())
    }

    /// Create an engine with a specific random source (deterministic fruit)
    pub fn with_rng(config: GameConfig, queue: InputQueue, rng: StdRng) -> Self {
        let grid = GridModel::from_config(&config);
        let start = grid.center();

        let mut engine = Self {
            snake: Snake::new(start, &grid),
            direction: Direction::Down,
            fruit: Fruit::new(grid.cell_origin(0, 0), &grid),
            state: GameState::new(config.initial_speed_ms),
            config,
            grid,
            queue,
            rng,
        };
        engine.reset();
        engine
    }

    /// Start a fresh game: one-cell snake in the centre heading down
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.grid.center(), &self.grid);
        self.direction = Direction::Down;
        self.state = GameState::new(self.config.initial_speed_ms);
        self.queue.reset(self.direction);

        if let Some(fruit) = self.spawn_fruit() {
            self.fruit = fruit;
        }
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_over {
            return TickOutcome::AlreadyOver;
        }

        let next = self.next_move();
        self.direction = next.direction;

        let head = self.snake.head().position;
        let candidate = head.moved_by(next.dx, next.dy);
        let target = match self.config.boundary {
            BoundaryPolicy::Walls => candidate,
            BoundaryPolicy::Wrap => self.grid.wrap(candidate),
        };

        if self.snake.collides_with_body(target) {
            return self.finish(CollisionType::SelfCollision);
        }

        if !self.grid.contains(target) {
            return self.finish(CollisionType::Wall);
        }

        let vacated = self.snake.advance(target, &self.grid);

        let ate_fruit = target == self.fruit.position;
        if ate_fruit {
            self.eat_fruit(vacated);
            if self.state.is_over {
                return TickOutcome::Collided(CollisionType::BoardFull);
            }
        }

        self.queue.commit(self.direction, self.snake.len());

        TickOutcome::Moved { ate_fruit }
    }

    /// Take at most one queued move, falling back to the committed direction
    fn next_move(&mut self) -> NextMove {
        let current = NextMove::new(self.direction, self.grid.cell_size());

        match self.queue.dequeue_one() {
            Some(next) if self.snake.len() > 2 && self.direction.is_opposite(next.direction) => {
                trace!(direction = ?next.direction, "Dropping queued reversal");
                current
            }
            Some(next) => next,
            None => current,
        }
    }

    fn eat_fruit(&mut self, vacated: Position) {
        self.snake.grow(vacated, &self.grid);
        self.state.score += 1;

        let floor = self
            .config
            .min_speed_ms
            .min(self.state.speed_ms)
            .max(MIN_TICK_MS);
        self.state.speed_ms = self
            .state
            .speed_ms
            .saturating_sub(self.config.speed_decrement_ms)
            .max(floor);

        debug!(
            score = self.state.score,
            speed_ms = self.state.speed_ms,
            length = self.snake.len(),
            "Fruit eaten"
        );

        match self.spawn_fruit() {
            Some(fruit) => self.fruit = fruit,
            None => {
                self.state.is_over = true;
            }
        }
    }

    fn finish(&mut self, collision: CollisionType) -> TickOutcome {
        self.state.is_over = true;
        TickOutcome::Collided(collision)
    }

    /// Spawn fruit at a random cell not covered by the snake.
    ///
    /// Returns `None` when the snake covers the whole grid.
    fn spawn_fruit(&mut self) -> Option<Fruit> {
        if self.snake.len() >= self.grid.total_cells() {
            return None;
        }

        loop {
            let column = self.rng.gen_range(0..self.grid.cells());
            let row = self.rng.gen_range(0..self.grid.cells());
            let pos = self.grid.cell_origin(column, row);

            if !self.snake.occupies(pos) {
                return Some(Fruit::new(pos, &self.grid));
            }
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid,
            snake: self.snake.cells().to_vec(),
            fruit: self.fruit,
            state: self.state,
            direction: self.direction,
        }
    }

    /// Replace the board with a hand-built position
    #[cfg(test)]
    pub(crate) fn set_board(&mut self, snake: Snake, direction: Direction, fruit: Position) {
        self.snake = snake;
        self.direction = direction;
        self.fruit = Fruit::new(fruit, &self.grid);
        self.queue.reset(direction);
        self.queue.commit(direction, self.snake.len());
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ColorTag;

    fn engine_with(config: GameConfig) -> (SnakeEngine, InputQueue) {
        let queue = InputQueue::from_config(&config);
        let engine = SnakeEngine::with_rng(config, queue.clone(), StdRng::seed_from_u64(7));
        (engine, queue)
    }

    fn positions(engine: &SnakeEngine) -> Vec<Position> {
        engine.snake().cells().iter().map(|c| c.position).collect()
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_reset() {
        let (engine, _) = engine_with(GameConfig::default());

        assert!(!engine.state().is_over);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().speed_ms, 200);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.snake().head().position, p(100, 100));
        assert_eq!(engine.direction(), Direction::Down);
        assert!(!engine.snake().occupies(engine.fruit().position));
    }

    #[test]
    fn test_basic_movement() {
        let (mut engine, _) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        engine.set_board(Snake::from_positions(&[p(40, 50), p(50, 50)], &grid), Direction::Right, p(0, 0));

        let result = engine.tick();

        assert_eq!(result, TickOutcome::Moved { ate_fruit: false });
        assert_eq!(positions(&engine), vec![p(50, 50), p(60, 50)]);
        assert_eq!(engine.snake().head().position_index, grid.position_index(p(60, 50)));
    }

    #[test]
    fn test_one_queued_move_per_tick() {
        let (mut engine, queue) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        engine.set_board(Snake::new(p(50, 50), &grid), Direction::Down, p(0, 0));

        queue.enqueue(Direction::Left);
        queue.enqueue(Direction::Up);

        engine.tick();
        assert_eq!(engine.snake().head().position, p(40, 50));
        assert_eq!(engine.direction(), Direction::Left);
        assert_eq!(queue.len(), 1);

        engine.tick();
        assert_eq!(engine.snake().head().position, p(40, 40));
        assert_eq!(engine.direction(), Direction::Up);

        // no more input: keep going up
        engine.tick();
        assert_eq!(engine.snake().head().position, p(40, 30));
    }

    #[test]
    fn test_fruit_consumption() {
        let (mut engine, _) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        let snake = Snake::from_positions(&[p(30, 50), p(40, 50), p(50, 50)], &grid);
        engine.set_board(snake, Direction::Right, p(60, 50));

        let result = engine.tick();

        assert_eq!(result, TickOutcome::Moved { ate_fruit: true });
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.state().speed_ms, 198);
        assert_eq!(positions(&engine), vec![p(30, 50), p(40, 50), p(50, 50), p(60, 50)]);
        assert_eq!(engine.snake().tail().color, ColorTag::Body3);
        assert!(!engine.snake().occupies(engine.fruit().position));
    }

    #[test]
    fn test_speed_floor() {
        let config = GameConfig {
            min_speed_ms: 40,
            ..GameConfig::small()
        };
        let (mut engine, _) = engine_with(config);
        let grid = *engine.grid();
        engine.set_board(Snake::new(p(50, 50), &grid), Direction::Right, p(60, 50));
        engine.state_mut().speed_ms = 41;

        engine.tick();
        assert_eq!(engine.state().speed_ms, 40);

        let fruit = engine.snake().head().position.moved_by(10, 0);
        let snake = engine.snake().clone();
        engine.set_board(snake, Direction::Right, fruit);
        engine.tick();
        assert_eq!(engine.state().score, 2);
        assert_eq!(engine.state().speed_ms, 40);
    }

    #[test]
    fn test_zero_floor_never_reaches_zero() {
        let config = GameConfig {
            min_speed_ms: 0,
            ..GameConfig::small()
        };
        let (mut engine, _) = engine_with(config);
        let grid = *engine.grid();
        engine.set_board(Snake::new(p(50, 50), &grid), Direction::Right, p(60, 50));
        engine.state_mut().speed_ms = 2;

        engine.tick();

        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.state().speed_ms, MIN_TICK_MS);
    }

    #[test]
    fn test_wall_collision() {
        let (mut engine, _) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        let snake = Snake::from_positions(&[p(20, 50), p(10, 50), p(0, 50)], &grid);
        engine.set_board(snake, Direction::Left, p(90, 90));

        let result = engine.tick();

        assert_eq!(result, TickOutcome::Collided(CollisionType::Wall));
        assert!(engine.state().is_over);
        assert_eq!(positions(&engine), vec![p(20, 50), p(10, 50), p(0, 50)]);
    }

    #[test]
    fn test_wall_at_far_edge() {
        let (mut engine, _) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        engine.set_board(Snake::new(p(90, 20), &grid), Direction::Right, p(0, 0));

        assert_eq!(engine.tick(), TickOutcome::Collided(CollisionType::Wall));
    }

    #[test]
    fn test_wraparound() {
        let config = GameConfig::small().with_boundary(BoundaryPolicy::Wrap);
        let (mut engine, _) = engine_with(config);
        let grid = *engine.grid();

        engine.set_board(Snake::new(p(90, 20), &grid), Direction::Right, p(0, 90));
        assert_eq!(engine.tick(), TickOutcome::Moved { ate_fruit: false });
        assert_eq!(engine.snake().head().position, p(0, 20));

        engine.set_board(Snake::new(p(0, 20), &grid), Direction::Left, p(0, 90));
        engine.tick();
        assert_eq!(engine.snake().head().position, p(90, 20));

        engine.set_board(Snake::new(p(30, 0), &grid), Direction::Up, p(0, 90));
        engine.tick();
        assert_eq!(engine.snake().head().position, p(30, 90));
    }

    #[test]
    fn test_self_collision() {
        let (mut engine, queue) = engine_with(GameConfig::small());
        let grid = *engine.grid();

        // Tail (40,40) -> (50,40) -> (60,40) -> (60,50) -> head (50,50), heading left
        let body = [p(40, 40), p(50, 40), p(60, 40), p(60, 50), p(50, 50)];
        engine.set_board(Snake::from_positions(&body, &grid), Direction::Left, p(90, 90));

        assert!(queue.enqueue(Direction::Up));
        let result = engine.tick();

        assert_eq!(result, TickOutcome::Collided(CollisionType::SelfCollision));
        assert!(engine.state().is_over);
        assert_eq!(positions(&engine), body.to_vec());
    }

    #[test]
    fn test_moving_into_vacating_tail() {
        let (mut engine, queue) = engine_with(GameConfig::small());
        let grid = *engine.grid();

        let body = [p(40, 40), p(50, 40), p(50, 50), p(40, 50)];
        engine.set_board(Snake::from_positions(&body, &grid), Direction::Left, p(90, 90));

        queue.enqueue(Direction::Up);
        let result = engine.tick();

        assert_eq!(result, TickOutcome::Moved { ate_fruit: false });
        assert_eq!(engine.snake().head().position, p(40, 40));
    }

    #[test]
    fn test_stale_reversal_dropped_at_dequeue() {
        let (mut engine, queue) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        let snake = Snake::from_positions(&[p(30, 50), p(40, 50), p(50, 50)], &grid);
        engine.set_board(snake, Direction::Right, p(90, 90));

        // The queue believes the snake is heading up, so Left gets through
        queue.commit(Direction::Up, 3);
        assert!(queue.enqueue(Direction::Left));

        let result = engine.tick();

        assert_eq!(result, TickOutcome::Moved { ate_fruit: false });
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.snake().head().position, p(60, 50));
    }

    #[test]
    fn test_short_snake_may_reverse() {
        let (mut engine, queue) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        let snake = Snake::from_positions(&[p(40, 50), p(50, 50)], &grid);
        engine.set_board(snake, Direction::Right, p(90, 90));

        assert!(queue.enqueue(Direction::Left));
        let result = engine.tick();

        assert_eq!(result, TickOutcome::Moved { ate_fruit: false });
        assert_eq!(positions(&engine), vec![p(50, 50), p(40, 50)]);
    }

    #[test]
    fn test_board_full() {
        let config = GameConfig {
            grid_cells: 2,
            ..GameConfig::default()
        };
        let (mut engine, _) = engine_with(config);
        let grid = *engine.grid();
        let snake = Snake::from_positions(&[p(0, 0), p(10, 0), p(10, 10)], &grid);
        engine.set_board(snake, Direction::Left, p(0, 10));

        let result = engine.tick();

        assert_eq!(result, TickOutcome::Collided(CollisionType::BoardFull));
        assert!(engine.state().is_over);
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.snake().len(), 4);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let (mut engine, _) = engine_with(GameConfig::small());
        engine.state_mut().is_over = true;
        let before = positions(&engine);

        assert_eq!(engine.tick(), TickOutcome::AlreadyOver);
        assert_eq!(positions(&engine), before);
    }

    #[test]
    fn test_commit_published_to_queue() {
        let (mut engine, queue) = engine_with(GameConfig::small());
        let grid = *engine.grid();
        let snake = Snake::from_positions(&[p(30, 50), p(40, 50), p(50, 50)], &grid);
        engine.set_board(snake, Direction::Right, p(90, 90));

        queue.enqueue(Direction::Up);
        engine.tick();

        assert_eq!(queue.committed(), Direction::Up);
        assert!(!queue.enqueue(Direction::Down));
    }
}
