use super::grid::GridModel;

/// A position on the game grid, in pixel units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Colour slot of a snake segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    Head,
    Body1,
    Body2,
    Body3,
}

impl ColorTag {
    /// The colour of the segment that follows this one towards the tail
    pub fn successor(self) -> ColorTag {
        match self {
            ColorTag::Head => ColorTag::Body1,
            ColorTag::Body1 => ColorTag::Body2,
            ColorTag::Body2 => ColorTag::Body3,
            ColorTag::Body3 => ColorTag::Body1,
        }
    }
}

/// One occupied grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub position_index: usize,
    pub color: ColorTag,
}

impl Cell {
    pub fn new(position: Position, grid: &GridModel, color: ColorTag) -> Self {
        Self {
            position,
            position_index: grid.position_index(position),
            color,
        }
    }
}

/// The fruit the snake is chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fruit {
    pub position: Position,
    pub position_index: usize,
}

impl Fruit {
    pub fn new(position: Position, grid: &GridModel) -> Self {
        Self {
            position,
            position_index: grid.position_index(position),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Segments with the tail at index 0 and the head last
    body: Vec<Cell>,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Position, grid: &GridModel) -> Self {
        Self {
            body: vec![Cell::new(head, grid, ColorTag::Head)],
        }
    }

    /// Build a snake from positions ordered tail first, head last.
    ///
    /// Colours are assigned walking back from the head, the same way growth
    /// would have produced them.
    pub fn from_positions(positions: &[Position], grid: &GridModel) -> Self {
        let mut color = ColorTag::Head;
        let mut body: Vec<Cell> = positions
            .iter()
            .rev()
            .map(|&pos| {
                let cell = Cell::new(pos, grid, color);
                color = color.successor();
                cell
            })
            .collect();
        body.reverse();
        if body.is_empty() {
            body.push(Cell::new(grid.center(), grid, ColorTag::Head));
        }
        Self { body }
    }

    pub fn head(&self) -> &Cell {
        &self.body[self.body.len() - 1]
    }

    pub fn tail(&self) -> &Cell {
        &self.body[0]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true; a snake always has a head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Check if any segment occupies the position
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.iter().any(|cell| cell.position == pos)
    }

    /// Check if moving the head to `pos` would hit the body.
    ///
    /// The head and the tail are skipped: the tail vacates its cell during the
    /// same tick.
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body
            .iter()
            .skip(1)
            .take(self.body.len().saturating_sub(2))
            .any(|cell| cell.position == pos)
    }

    /// Shift every segment one slot towards the head and place the head at
    /// `new_head`. Returns the position the tail vacated.
    pub fn advance(&mut self, new_head: Position, grid: &GridModel) -> Position {
        let vacated = self.body[0].position;
        let last = self.body.len() - 1;
        for i in 0..last {
            self.body[i].position = self.body[i + 1].position;
            self.body[i].position_index = self.body[i + 1].position_index;
        }
        self.body[last].position = new_head;
        self.body[last].position_index = grid.position_index(new_head);
        vacated
    }

    /// Add a segment behind the tail at `pos`
    pub fn grow(&mut self, pos: Position, grid: &GridModel) {
        let color = self.tail().color.successor();
        self.body.insert(0, Cell::new(pos, grid, color));
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No free cell left for fruit
    BoardFull,
}

/// Score and pacing of the running game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub speed_ms: u64,
    pub is_over: bool,
}

impl GameState {
    pub fn new(speed_ms: u64) -> Self {
        Self {
            score: 0,
            speed_ms,
            is_over: false,
        }
    }
}
