//! Terminal-state detection
//!
//! Collection games end when no fruit is left or when the side to move is
//! walled in; the higher score wins. Line games end when a player owns
//! `length` consecutive cells along a row, column or diagonal, or when no
//! empty cell remains.

use std::cmp::Ordering;

use crate::board::{Board, Cell, PlayerId, Pos};
use crate::player::Players;

use super::{Goal, RuleSet, TerminalStatus};

/// Direction vectors for line checking (4 axes)
const DIRECTIONS: [(i8, i8); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

impl RuleSet {
    /// Classify the position. Pure: depends only on its arguments.
    pub fn is_terminal(&self, board: &Board, players: &Players, side: PlayerId) -> TerminalStatus {
        match self.goal {
            Goal::Collect => {
                let exhausted = board.count(Cell::is_fruit) == 0;
                if exhausted || !self.has_legal_move(board, players, side) {
                    by_score(players)
                } else {
                    TerminalStatus::Ongoing
                }
            }
            Goal::Line { length } => {
                for player in PlayerId::ALL {
                    if has_line(board, player, length) {
                        return TerminalStatus::Won(player);
                    }
                }
                if board.count(Cell::is_empty) == 0 {
                    TerminalStatus::Tie
                } else {
                    TerminalStatus::Ongoing
                }
            }
        }
    }
}

/// Strictly higher score wins
fn by_score(players: &Players) -> TerminalStatus {
    let human = players[PlayerId::Human].score;
    let computer = players[PlayerId::Computer].score;
    match computer.cmp(&human) {
        Ordering::Greater => TerminalStatus::Won(PlayerId::Computer),
        Ordering::Less => TerminalStatus::Won(PlayerId::Human),
        Ordering::Equal => TerminalStatus::Tie,
    }
}

/// Check if `player` owns a run of at least `length` cells anywhere
pub fn has_line(board: &Board, player: PlayerId, length: u8) -> bool {
    find_line(board, player, length).is_some()
}

/// Find the cells of a winning run if one exists
///
/// Every owned cell is tried as the start of a run along every axis, so
/// diagonals starting anywhere are found. Returns the first `length` cells
/// of the first run in row-major order.
pub fn find_line(board: &Board, player: PlayerId, length: u8) -> Option<Vec<Pos>> {
    let mark = Cell::Occupied(player);
    let length = length as usize;

    for (start, cell) in board.iter() {
        if cell != mark {
            continue;
        }
        for (dr, dc) in DIRECTIONS {
            let mut line = vec![start];
            let mut cur = start;
            while line.len() < length {
                match cur.offset(dr, dc).filter(|&p| board.contains(p)) {
                    Some(next) if board[next] == mark => {
                        line.push(next);
                        cur = next;
                    }
                    _ => break,
                }
            }
            if line.len() >= length {
                return Some(line);
            }
        }
    }
    None
}
