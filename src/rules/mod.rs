//! Game rules shared by every variant
//!
//! A variant is a [`RuleSet`] value, not a type: the move model, the goal
//! and the scoring discipline are plain enums combined at construction.
//! - Legality and move generation ([`legality`])
//! - Apply/undo of a single ply ([`apply`])
//! - Terminal detection and N-in-a-row lines ([`terminal`])

pub mod apply;
pub mod legality;
pub mod terminal;

use derive_more::{Display, Error};

use crate::board::{PlayerId, Pos};
use crate::config::ConfigError;

// Re-exports for convenient access
pub use apply::UndoToken;
pub use legality::{LegalMoves, MoveCursor};
pub use terminal::{find_line, has_line};

/// How a player selects the cell for a ply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveModel {
    /// Any open cell anywhere on the board
    FreePlacement,
    /// One orthogonal step from the mover's tracked position
    DirectionalStep,
}

/// What ends the game and decides the winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Eat every fruit; the higher score wins
    Collect,
    /// First to place `length` marks in a row, column or diagonal
    Line { length: u8 },
}

/// How search values are accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scoring {
    /// Every ply adds the eaten tile's points (computer minus human)
    Accumulate,
    /// Only terminal nodes carry value: +1 win, 0 tie, -1 loss
    Outcome,
}

/// Who moves after a ply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnOrder {
    Alternating,
    /// The side to move never changes
    Solo,
}

/// Orthogonal step, listed so that targets come out in row-major order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];

    /// `(row, col)` offset
    #[inline]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
        }
    }

    /// Direction leading from `from` to an orthogonal neighbour `to`
    pub fn between(from: Pos, to: Pos) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| from.offset(d.delta().0, d.delta().1) == Some(to))
    }
}

/// Result of terminal detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalStatus {
    Ongoing,
    Tie,
    Won(PlayerId),
}

impl TerminalStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        !matches!(self, TerminalStatus::Ongoing)
    }

    pub fn winner(self) -> Option<PlayerId> {
        match self {
            TerminalStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Why a candidate move was rejected
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum IllegalMove {
    #[display("coordinate {_0} is not valid")]
    OutOfBounds(#[error(not(source))] Pos),
    #[display("stepping {_0} leaves the board")]
    OffEdge(#[error(not(source))] Direction),
    #[display("cell {_0} is blocked by an obstacle")]
    Obstacle(#[error(not(source))] Pos),
    #[display("cell {_0} has already been eaten")]
    Eaten(#[error(not(source))] Pos),
    #[display("cell {_0} is where your opponent stands")]
    OpponentOccupied(#[error(not(source))] Pos),
    #[display("cell {_0} is already taken")]
    Occupied(#[error(not(source))] Pos),
    #[display("cell {_0} holds nothing to collect")]
    NotConsumable(#[error(not(source))] Pos),
    #[display("cell {_0} is not one step away")]
    NotAStep(#[error(not(source))] Pos),
    #[display("this game is played with {_0}")]
    WrongMoveKind(#[error(not(source))] &'static str),
    #[display("could not read a move from {_0:?}")]
    Malformed(#[error(not(source))] String),
    #[display("it is not your turn")]
    NotYourTurn,
    #[display("the game is over")]
    GameOver,
}

/// Variant policy: move model, goal and scoring for an R×C board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    rows: u8,
    cols: u8,
    model: MoveModel,
    goal: Goal,
    scoring: Scoring,
    turns: TurnOrder,
}

impl RuleSet {
    pub fn new(
        rows: u8,
        cols: u8,
        model: MoveModel,
        goal: Goal,
        scoring: Scoring,
        turns: TurnOrder,
    ) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidSize { rows, cols });
        }
        if let Goal::Line { length } = goal {
            if model == MoveModel::DirectionalStep {
                return Err(ConfigError::UnsupportedCombination {
                    reason: "line goals need free placement",
                });
            }
            if length == 0 {
                return Err(ConfigError::InvalidLineLength { length, rows, cols });
            }
        }
        Ok(Self {
            rows,
            cols,
            model,
            goal,
            scoring,
            turns,
        })
    }

    /// Tic-tac-toe style rules on an R×C board
    pub fn line(rows: u8, cols: u8, length: u8) -> Result<Self, ConfigError> {
        Self::new(
            rows,
            cols,
            MoveModel::FreePlacement,
            Goal::Line { length },
            Scoring::Outcome,
            TurnOrder::Alternating,
        )
    }

    /// Fruit-eating rules with one-step movement
    pub fn fruit_duel(rows: u8, cols: u8) -> Result<Self, ConfigError> {
        Self::new(
            rows,
            cols,
            MoveModel::DirectionalStep,
            Goal::Collect,
            Scoring::Accumulate,
            TurnOrder::Alternating,
        )
    }

    /// Fruit-picking rules where any fruit may be taken
    pub fn harvest(rows: u8, cols: u8, turns: TurnOrder) -> Result<Self, ConfigError> {
        Self::new(
            rows,
            cols,
            MoveModel::FreePlacement,
            Goal::Collect,
            Scoring::Accumulate,
            turns,
        )
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    #[inline]
    pub fn model(&self) -> MoveModel {
        self.model
    }

    #[inline]
    pub fn goal(&self) -> Goal {
        self.goal
    }

    #[inline]
    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    #[inline]
    pub fn turns(&self) -> TurnOrder {
        self.turns
    }

    /// Side to move after `side` has played
    #[inline]
    pub fn next_side(&self, side: PlayerId) -> PlayerId {
        match self.turns {
            TurnOrder::Alternating => side.opponent(),
            TurnOrder::Solo => side,
        }
    }
}
