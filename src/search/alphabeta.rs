//! Minimax search with alpha-beta pruning
//!
//! This module implements the core search algorithm for the computer player.
//! The search always runs to the end of the game tree: depth is bounded only
//! by the board running out of moves.
//!
//! # Features
//!
//! - In-place traversal: every ply is applied to the caller's board and
//!   undone before the next sibling, so no board is ever copied
//! - Row-major move order with first-best tie-break, identical to an
//!   unpruned minimax
//! - Two scoring disciplines: accumulated tile points, or a normalized
//!   win/tie/loss outcome decided at terminal nodes
//!
//! # Example
//!
//! ```
//! use grid_duel::board::{Board, Cell, PlayerId, Pos, TileKind};
//! use grid_duel::player::Players;
//! use grid_duel::rules::{RuleSet, TurnOrder};
//! use grid_duel::search::Searcher;
//!
//! let rules = RuleSet::harvest(1, 2, TurnOrder::Solo).unwrap();
//! let fruit = |points| Cell::Fruit { kind: TileKind(0), points };
//! let mut board = Board::from_cells(1, 2, vec![fruit(4), fruit(1)]).unwrap();
//! let mut players = Players::fruit_duel();
//!
//! let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
//! assert_eq!(result.value, 5);
//! assert_eq!(result.best_move, Some(Pos::new(0, 0)));
//! ```

use crate::board::{Board, PlayerId, Pos};
use crate::player::Players;
use crate::rules::{MoveCursor, RuleSet, Scoring, TerminalStatus};

/// Infinity score for alpha-beta bounds. Leaves headroom so that adding
/// tile values to a bound never overflows.
pub const INF: i32 = i32::MAX / 4;

/// Outcome values for normalized scoring
pub const WIN: i32 = 1;
pub const LOSS: i32 = -1;

/// Search role of a side: the computer maximizes, the human minimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Maximizer,
    Minimizer,
}

impl Role {
    #[inline]
    pub fn of(side: PlayerId) -> Role {
        match side {
            PlayerId::Computer => Role::Maximizer,
            PlayerId::Human => Role::Minimizer,
        }
    }
}

/// Search statistics for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Subtrees skipped by a bound cutoff
    pub cutoffs: u64,
    /// Terminal positions reached
    pub leaves: u64,
    /// Deepest ply visited
    pub max_ply: u32,
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Game-theoretic value under optimal play
    pub value: i32,
    /// First row-major move achieving `value`; `None` only at terminal positions
    pub best_move: Option<Pos>,
    /// Total nodes searched
    pub nodes: u64,
    /// Search diagnostics
    pub stats: SearchStats,
}

/// Full-depth alpha-beta searcher for one rule set
pub struct Searcher<'r> {
    rules: &'r RuleSet,
    nodes: u64,
    stats: SearchStats,
}

impl<'r> Searcher<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    /// Search from the current position with an open window.
    ///
    /// The board and players are mutated during the search and restored
    /// before returning.
    pub fn search(
        &mut self,
        board: &mut Board,
        players: &mut Players,
        side: PlayerId,
    ) -> SearchResult {
        self.search_window(board, players, side, -INF, INF)
    }

    /// Search with caller-supplied bounds. Narrow bounds may return a bound
    /// instead of the exact value, but the move is always a legal one.
    pub fn search_window(
        &mut self,
        board: &mut Board,
        players: &mut Players,
        side: PlayerId,
        alpha: i32,
        beta: i32,
    ) -> SearchResult {
        self.nodes = 0;
        self.stats = SearchStats::default();

        let (alpha, beta) = (alpha.max(-INF), beta.min(INF));
        let (value, best_move) = self.alphabeta(board, players, side, alpha, beta, 0);

        SearchResult {
            value,
            best_move,
            nodes: self.nodes,
            stats: self.stats.clone(),
        }
    }

    /// Value of a terminal position for the configured scoring discipline
    #[inline]
    fn terminal_value(&self, status: TerminalStatus) -> i32 {
        match self.rules.scoring() {
            // Points were already added ply by ply on the way down
            Scoring::Accumulate => 0,
            Scoring::Outcome => match status {
                TerminalStatus::Won(PlayerId::Computer) => WIN,
                TerminalStatus::Won(PlayerId::Human) => LOSS,
                TerminalStatus::Tie | TerminalStatus::Ongoing => 0,
            },
        }
    }

    fn alphabeta(
        &mut self,
        board: &mut Board,
        players: &mut Players,
        side: PlayerId,
        mut alpha: i32,
        mut beta: i32,
        ply: u32,
    ) -> (i32, Option<Pos>) {
        self.nodes += 1;
        self.stats.max_ply = self.stats.max_ply.max(ply);

        let status = self.rules.is_terminal(board, players, side);
        if status.is_over() {
            self.stats.leaves += 1;
            return (self.terminal_value(status), None);
        }

        let role = Role::of(side);
        let next_side = self.rules.next_side(side);
        let mut best = match role {
            Role::Maximizer => -INF,
            Role::Minimizer => INF,
        };
        let mut best_move = None;
        let mut cursor = MoveCursor::default();

        while let Some(mv) = self.rules.next_legal(board, players, side, &mut cursor) {
            // Signed contribution of this ply to the computer's advantage
            let delta = match self.rules.scoring() {
                Scoring::Accumulate => match role {
                    Role::Maximizer => self.rules.value_of(board, mv),
                    Role::Minimizer => -self.rules.value_of(board, mv),
                },
                Scoring::Outcome => 0,
            };

            let token = self.rules.apply(board, players, side, mv);
            // Child bounds are expressed relative to the position after this ply
            let (child, _) =
                self.alphabeta(board, players, next_side, alpha - delta, beta - delta, ply + 1);
            self.rules.undo(board, players, side, token);

            let candidate = child + delta;

            match role {
                Role::Maximizer => {
                    if candidate > best {
                        best = candidate;
                        best_move = Some(mv);
                    }
                    if best >= beta {
                        self.stats.cutoffs += 1;
                        return (best, best_move);
                    }
                    alpha = alpha.max(best);
                }
                Role::Minimizer => {
                    if candidate < best {
                        best = candidate;
                        best_move = Some(mv);
                    }
                    if best <= alpha {
                        self.stats.cutoffs += 1;
                        return (best, best_move);
                    }
                    beta = beta.min(best);
                }
            }
        }

        if best_move.is_none() {
            unreachable!("no legal move for {side} at a non-terminal position");
        }
        (best, best_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, TileKind};
    use crate::rules::TurnOrder;

    fn fruit(points: i32) -> Cell {
        Cell::Fruit {
            kind: TileKind(0),
            points,
        }
    }

    fn marks(rows: u8, cols: u8, cells: &[(u8, u8, PlayerId)]) -> Board {
        let mut board = Board::new(rows, cols);
        for &(r, c, p) in cells {
            board[Pos::new(r, c)] = Cell::Occupied(p);
        }
        board
    }

    #[test]
    fn test_search_empty_2x2_is_a_tie() {
        let rules = RuleSet::line(2, 2, 3).unwrap();
        let mut board = Board::new(2, 2);
        let mut players = Players::noughts_and_crosses();

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
        assert_eq!(result.value, 0);
        assert_eq!(result.best_move, Some(Pos::new(0, 0)));
        assert_eq!(board, Board::new(2, 2));
    }

    #[test]
    fn test_search_finds_winning_move() {
        let rules = RuleSet::line(3, 3, 3).unwrap();
        let (h, c) = (PlayerId::Human, PlayerId::Computer);
        // O O .
        // X X .
        // X . .
        let mut board = marks(3, 3, &[(0, 0, c), (0, 1, c), (1, 0, h), (1, 1, h), (2, 0, h)]);
        let mut players = Players::noughts_and_crosses();

        let result = Searcher::new(&rules).search(&mut board, &mut players, c);
        assert_eq!(result.value, WIN);
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
    }

    #[test]
    fn test_search_blocks_opponent_win() {
        let rules = RuleSet::line(3, 3, 3).unwrap();
        let (h, c) = (PlayerId::Human, PlayerId::Computer);
        // X X .
        // . O .
        // . . .
        let mut board = marks(3, 3, &[(0, 0, h), (0, 1, h), (1, 1, c)]);
        let mut players = Players::noughts_and_crosses();

        let result = Searcher::new(&rules).search(&mut board, &mut players, c);
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
    }

    #[test]
    fn test_solo_collects_everything() {
        let rules = RuleSet::harvest(1, 2, TurnOrder::Solo).unwrap();
        let mut board = Board::from_cells(1, 2, vec![fruit(4), fruit(1)]).unwrap();
        let mut players = Players::fruit_duel();

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
        assert_eq!(result.value, 5);
        assert_eq!(result.best_move, Some(Pos::new(0, 0)));
        assert_eq!(players.scores(), [0, 0]);
    }

    #[test]
    fn test_solo_value_is_sum_of_all_tiles() {
        // Solo play must eat every tile, penalties included
        let rules = RuleSet::harvest(1, 3, TurnOrder::Solo).unwrap();
        let mut board = Board::from_cells(1, 3, vec![fruit(-3), fruit(2), fruit(1)]).unwrap();
        let mut players = Players::fruit_duel();

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
        assert_eq!(result.value, 0);
        assert_eq!(result.best_move, Some(Pos::new(0, 0)));
    }

    #[test]
    fn test_alternating_harvest_differential() {
        // Computer takes 4, human takes 3, computer takes 1: 5 - 3 = 2
        let rules = RuleSet::harvest(1, 3, TurnOrder::Alternating).unwrap();
        let mut board = Board::from_cells(1, 3, vec![fruit(1), fruit(4), fruit(3)]).unwrap();
        let mut players = Players::fruit_duel();

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
        assert_eq!(result.value, 2);
        assert_eq!(result.best_move, Some(Pos::new(0, 1)));
    }

    #[test]
    fn test_human_to_move_minimizes() {
        let rules = RuleSet::harvest(1, 3, TurnOrder::Alternating).unwrap();
        let mut board = Board::from_cells(1, 3, vec![fruit(1), fruit(4), fruit(3)]).unwrap();
        let mut players = Players::fruit_duel();

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Human);
        assert_eq!(result.value, -2);
        assert_eq!(result.best_move, Some(Pos::new(0, 1)));
    }

    #[test]
    fn test_terminal_position_has_no_move() {
        let rules = RuleSet::harvest(1, 1, TurnOrder::Alternating).unwrap();
        let mut board = Board::from_cells(1, 1, vec![Cell::Eaten]).unwrap();
        let mut players = Players::fruit_duel();

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
        assert_eq!(result.best_move, None);
        assert_eq!(result.value, 0);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_duel_walk() {
        // H 1 4
        // # 2 C
        // 1 1 3
        let rules = RuleSet::fruit_duel(3, 3).unwrap();
        let mut board = Board::from_cells(
            3,
            3,
            vec![
                Cell::Occupied(PlayerId::Human),
                fruit(1),
                fruit(4),
                Cell::Obstacle,
                fruit(2),
                Cell::Occupied(PlayerId::Computer),
                fruit(1),
                fruit(1),
                fruit(3),
            ],
        )
        .unwrap();
        let mut players = Players::fruit_duel();
        players[PlayerId::Human].pos = Some(Pos::new(0, 0));
        players[PlayerId::Computer].pos = Some(Pos::new(1, 2));
        let (board_before, players_before) = (board.clone(), players.clone());

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
        assert!(result.best_move.is_some());
        assert!(result.nodes > 1);
        assert_eq!(board, board_before);
        assert_eq!(players, players_before);
    }

    #[test]
    fn test_pruning_counts_cutoffs() {
        let rules = RuleSet::line(3, 3, 3).unwrap();
        let mut board = marks(3, 3, &[(1, 1, PlayerId::Human)]);
        let mut players = Players::noughts_and_crosses();

        let result = Searcher::new(&rules).search(&mut board, &mut players, PlayerId::Computer);
        assert_eq!(result.value, 0);
        assert!(result.stats.cutoffs > 0);
        assert_eq!(result.stats.max_ply, 8);
    }
}
