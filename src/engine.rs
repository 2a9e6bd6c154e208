//! Computer player integrating the search with timing and logging
//!
//! The engine owns a copy of the session's [`RuleSet`] and runs a
//! full-depth search on the board it is handed. It never keeps a board of
//! its own: the caller's board is used as the search scratch space and is
//! restored before `get_move` returns.
//!
//! # Example
//!
//! ```
//! use grid_duel::{AIEngine, Board, PlayerId, Players, Pos, RuleSet};
//!
//! let rules = RuleSet::line(3, 3, 3).unwrap();
//! let mut engine = AIEngine::new(rules);
//! let mut board = Board::new(3, 3);
//! let mut players = Players::noughts_and_crosses();
//!
//! let result = engine.get_move_with_stats(&mut board, &mut players, PlayerId::Computer);
//! println!("Best move: {:?} (value {})", result.best_move, result.value);
//! assert_eq!(result.value, 0);
//! ```

use std::time::Instant;

use tracing::{debug, instrument};

use crate::board::{Board, PlayerId, Pos};
use crate::player::Players;
use crate::rules::RuleSet;
use crate::search::{SearchResult, SearchStats, Searcher};

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Value of the position under optimal play
    pub value: i32,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
    /// Search diagnostics
    pub stats: SearchStats,
}

impl MoveResult {
    #[inline]
    fn from_search(result: SearchResult, time_ms: u64) -> Self {
        Self {
            best_move: result.best_move,
            value: result.value,
            time_ms,
            nodes: result.nodes,
            stats: result.stats,
        }
    }
}

/// Computer player.
///
/// Runs minimax with alpha-beta pruning to the end of the game tree. There
/// is no depth or time limit, so large boards are slow by nature.
#[derive(Debug, Clone)]
pub struct AIEngine {
    rules: RuleSet,
    /// Total nodes searched over the engine's lifetime
    total_nodes: u64,
}

impl AIEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            total_nodes: 0,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn total_nodes(&self) -> u64 {
        self.total_nodes
    }

    /// Get best move for `side`
    pub fn get_move(
        &mut self,
        board: &mut Board,
        players: &mut Players,
        side: PlayerId,
    ) -> Option<Pos> {
        self.get_move_with_stats(board, players, side).best_move
    }

    /// Get best move with search statistics
    #[instrument(skip_all, fields(side = %side))]
    pub fn get_move_with_stats(
        &mut self,
        board: &mut Board,
        players: &mut Players,
        side: PlayerId,
    ) -> MoveResult {
        #[cfg(debug_assertions)]
        let snapshot = (board.clone(), players.clone());

        let start = Instant::now();
        let result = Searcher::new(&self.rules).search(board, players, side);
        let time_ms = start.elapsed().as_millis() as u64;

        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(snapshot.0, *board, "search left the board modified");
            debug_assert_eq!(snapshot.1, *players, "search left the players modified");
        }

        self.total_nodes += result.nodes;
        debug!(
            value = result.value,
            best_move = ?result.best_move,
            nodes = result.nodes,
            cutoffs = result.stats.cutoffs,
            time_ms,
            "search finished"
        );

        MoveResult::from_search(result, time_ms)
    }
}
