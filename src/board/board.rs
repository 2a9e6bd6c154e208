//! Board structure: an R×C grid of cells

use std::ops::{Index, IndexMut};

use derive_more::{Display, Error};

use super::{Cell, PlayerId, Pos};

/// Errors raised by checked board access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Position lies outside the grid
    #[display("coordinate ({row}, {col}) is not valid on a {rows}x{cols} board")]
    OutOfBounds { row: u8, col: u8, rows: u8, cols: u8 },
    /// Cell vector does not match the requested dimensions
    #[display("expected {expected} cells, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Game board
///
/// The board enforces no legality; it only guards its own bounds.
/// Move rules live in [`RuleSet`](crate::rules::RuleSet).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: u8,
    cols: u8,
    /// Row-major cells
    cells: Vec<Cell>,
}

impl Board {
    /// Create a board with every cell `Empty`
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows as usize * cols as usize],
        }
    }

    /// Create a board from row-major cells
    pub fn from_cells(rows: u8, cols: u8, cells: Vec<Cell>) -> Result<Self, BoardError> {
        let expected = rows as usize * cols as usize;
        if cells.len() != expected {
            return Err(BoardError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    pub fn to_index(&self, pos: Pos) -> usize {
        pos.row as usize * self.cols as usize + pos.col as usize
    }

    #[inline]
    pub fn from_index(&self, idx: usize) -> Pos {
        Pos {
            row: (idx / self.cols as usize) as u8,
            col: (idx % self.cols as usize) as u8,
        }
    }

    fn check(&self, pos: Pos) -> Result<usize, BoardError> {
        if self.contains(pos) {
            Ok(self.to_index(pos))
        } else {
            Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Get cell at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Result<Cell, BoardError> {
        self.check(pos).map(|idx| self.cells[idx])
    }

    /// Overwrite the cell at position
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<(), BoardError> {
        let idx = self.check(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Number of cells matching the predicate
    pub fn count(&self, predicate: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|&&c| predicate(c)).count()
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cells.len()).map(move |idx| self.from_index(idx))
    }

    /// `(position, cell)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| (self.from_index(idx), cell))
    }

    /// First position (row-major) whose cell matches the predicate
    pub fn find(&self, predicate: impl Fn(Cell) -> bool) -> Option<Pos> {
        self.cells
            .iter()
            .position(|&c| predicate(c))
            .map(|idx| self.from_index(idx))
    }

    /// Cell holding the given player's marker (tracked-position variants)
    pub fn position_of(&self, player: PlayerId) -> Option<Pos> {
        self.find(|c| c == Cell::Occupied(player))
    }

    /// Row slice, for renderers
    pub fn row(&self, row: u8) -> &[Cell] {
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }
}

/// Unchecked access for positions already known to be on the board.
/// Panics on out-of-bounds like slice indexing.
impl Index<Pos> for Board {
    type Output = Cell;

    #[inline]
    fn index(&self, pos: Pos) -> &Cell {
        debug_assert!(self.contains(pos), "{pos} outside {}x{}", self.rows, self.cols);
        &self.cells[self.to_index(pos)]
    }
}

impl IndexMut<Pos> for Board {
    #[inline]
    fn index_mut(&mut self, pos: Pos) -> &mut Cell {
        debug_assert!(self.contains(pos), "{pos} outside {}x{}", self.rows, self.cols);
        let idx = self.to_index(pos);
        &mut self.cells[idx]
    }
}
