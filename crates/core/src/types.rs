use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn is_cardinal_neighbor(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

/// Unit step on the grid. `Up` decreases `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction of a single cardinal step, if `from -> to` is one.
    pub fn between(from: Pos, to: Pos) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellType {
    #[default]
    Empty,
    Floor,
    FloorCenter,
    Path,
    ExpandedPath,
    Wall,
    PathWall,
    Gate,
    MainGate,
    SubGate,
}

impl CellType {
    pub fn is_floor(self) -> bool {
        matches!(self, CellType::Floor | CellType::FloorCenter)
    }

    pub fn is_corridor(self) -> bool {
        matches!(self, CellType::Path | CellType::ExpandedPath)
    }

    pub fn is_gate(self) -> bool {
        matches!(self, CellType::Gate | CellType::MainGate | CellType::SubGate)
    }

    pub fn is_wall(self) -> bool {
        matches!(self, CellType::Wall | CellType::PathWall)
    }

    pub fn is_walkable(self) -> bool {
        self.is_floor() || self.is_corridor() || self.is_gate()
    }

    pub fn glyph(self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Floor => '.',
            CellType::FloorCenter => 'o',
            CellType::Path => '=',
            CellType::ExpandedPath => '-',
            CellType::Wall => '#',
            CellType::PathWall => '%',
            CellType::Gate => 'G',
            CellType::MainGate => 'M',
            CellType::SubGate => 's',
        }
    }
}

/// Axis-aligned room rectangle in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn center(self) -> Pos {
        Pos {
            y: (self.y + (self.height - 1) / 2) as i32,
            x: (self.x + (self.width - 1) / 2) as i32,
        }
    }

    /// Geometric center used as the triangulation vertex.
    pub fn centroid(self) -> (f64, f64) {
        (self.x as f64 + self.width as f64 / 2.0, self.y as f64 + self.height as f64 / 2.0)
    }

    pub fn expanded(self, margin: usize) -> Self {
        let expanded_x = self.x.saturating_sub(margin);
        let expanded_y = self.y.saturating_sub(margin);
        let expanded_right = self.right().saturating_add(margin);
        let expanded_bottom = self.bottom().saturating_add(margin);
        Self {
            x: expanded_x,
            y: expanded_y,
            width: expanded_right - expanded_x + 1,
            height: expanded_bottom - expanded_y + 1,
        }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// True when at least `margin` cells separate the two rooms on some axis.
    pub fn is_separated_from(self, other: &Self, margin: usize) -> bool {
        !self.expanded(margin).intersects(other)
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        let px = pos.x as usize;
        let py = pos.y as usize;
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn cells(self) -> impl Iterator<Item = Pos> {
        (self.y..=self.bottom()).flat_map(move |y| {
            (self.x..=self.right()).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    Start,
    Exit,
    #[default]
    Normal,
    Special,
}
