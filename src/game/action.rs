/// Key code for the left arrow key
pub const KEY_LEFT: u32 = 37;
/// Key code for the up arrow key
pub const KEY_UP: u32 = 38;
/// Key code for the right arrow key
pub const KEY_RIGHT: u32 = 39;
/// Key code for the down arrow key
pub const KEY_DOWN: u32 = 40;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the unit delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Translate an arrow key code (37-40) into a direction
    pub fn from_key_code(code: u32) -> Option<Direction> {
        match code {
            KEY_LEFT => Some(Direction::Left),
            KEY_UP => Some(Direction::Up),
            KEY_RIGHT => Some(Direction::Right),
            KEY_DOWN => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn key_code(&self) -> u32 {
        match self {
            Direction::Left => KEY_LEFT,
            Direction::Up => KEY_UP,
            Direction::Right => KEY_RIGHT,
            Direction::Down => KEY_DOWN,
        }
    }
}

/// A queued direction change with its pixel displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextMove {
    pub dx: i32,
    pub dy: i32,
    pub direction: Direction,
}

impl NextMove {
    /// Build the move for `direction` on a grid whose cells are `cell_size` pixels wide
    pub fn new(direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            dx: dx * cell_size,
            dy: dy * cell_size,
            direction,
        }
    }
}
