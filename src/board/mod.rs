//! Board representation for grid duel games

pub mod board;


// Re-exports
pub use board::{Board, BoardError};

/// The two sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum PlayerId {
    Human,
    Computer,
}

impl PlayerId {
    /// Both players in seat order (index 0, then index 1)
    pub const ALL: [PlayerId; 2] = [PlayerId::Human, PlayerId::Computer];

    /// Get opponent
    #[inline]
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Human => PlayerId::Computer,
            PlayerId::Computer => PlayerId::Human,
        }
    }

    /// Seat index in the two-element player list
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::Human => 0,
            PlayerId::Computer => 1,
        }
    }
}

/// Index of a tile kind in the session's [`TileSet`](crate::tiles::TileSet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKind(pub u8);

/// Contents of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Fruit { kind: TileKind, points: i32 },
    Obstacle,
    Eaten,
    Occupied(PlayerId),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[inline]
    pub fn is_fruit(self) -> bool {
        matches!(self, Cell::Fruit { .. })
    }

    #[inline]
    pub fn is_occupied_by(self, player: PlayerId) -> bool {
        self == Cell::Occupied(player)
    }

    /// Points gained by consuming this cell (zero for anything but fruit)
    #[inline]
    pub fn points(self) -> i32 {
        match self {
            Cell::Fruit { points, .. } => points,
            _ => 0,
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Position shifted by a signed offset, or `None` if it would leave
    /// the non-negative quadrant. Upper bounds are the board's concern.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Pos> {
        let row = u8::try_from(self.row as i16 + dr as i16).ok()?;
        let col = u8::try_from(self.col as i16 + dc as i16).ok()?;
        Some(Pos { row, col })
    }

    /// Manhattan distance
    #[inline]
    pub fn distance(self, other: Pos) -> u32 {
        (self.row.abs_diff(other.row) as u32) + (self.col.abs_diff(other.col) as u32)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Row-major ordering
impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}
