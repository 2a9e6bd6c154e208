//! Two-player grid games against a full-depth alpha-beta opponent
//!
//! Every game is played on a rectangular grid of cells by a human and the
//! computer. The built-in variants are:
//! - Fruit duel: both players walk one step at a time, eating the fruit
//!   they step on; eaten cells and obstacles block movement
//! - Harvest: pick any fruit on the board each turn
//! - Solo: harvest with only the computer moving
//! - Line: tic-tac-toe, first to complete N in a row wins
//!
//! # Architecture
//!
//! - [`board`]: Grid of cells, positions and player identities
//! - [`rules`]: Legality, apply/undo and terminal detection for a [`RuleSet`]
//! - [`search`]: Minimax with alpha-beta pruning over an in-place board
//! - [`engine`]: Computer player wrapping the search with timing and logging
//! - [`session`]: Turn loop, permanent moves and outcome reporting
//! - [`setup`], [`tiles`], [`player`], [`config`]: Game setup
//! - [`console`], [`ui`]: Text and windowed front ends
//!
//! # Quick Start
//!
//! ```
//! use grid_duel::{AIEngine, Board, Cell, PlayerId, Players, Pos, RuleSet};
//!
//! // Tic-tac-toe with one mark placed by the human
//! let rules = RuleSet::line(3, 3, 3).unwrap();
//! let mut board = Board::new(3, 3);
//! let mut players = Players::noughts_and_crosses();
//! board[Pos::new(1, 1)] = Cell::Occupied(PlayerId::Human);
//!
//! // Computer responds
//! let mut engine = AIEngine::new(rules);
//! if let Some(pos) = engine.get_move(&mut board, &mut players, PlayerId::Computer) {
//!     let _ = rules.apply(&mut board, &mut players, PlayerId::Computer, pos);
//!     println!("AI plays at {pos}");
//! }
//! ```
//!
//! # Performance
//!
//! The search always runs to the end of the game. Alpha-beta pruning keeps
//! small boards interactive, but the cost grows exponentially with the
//! number of cells.

pub mod board;
pub mod config;
pub mod console;
pub mod engine;
pub mod player;
pub mod rules;
pub mod search;
pub mod session;
pub mod setup;
pub mod tiles;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, PlayerId, Pos, TileKind};
pub use config::{Cli, ConfigError, GameConfig, Variant};
pub use engine::{AIEngine, MoveResult};
pub use player::{Player, Players};
pub use rules::{IllegalMove, RuleSet, TerminalStatus};
pub use session::{GameSession, HumanMove, Outcome, SessionError};
pub use tiles::TileSet;
