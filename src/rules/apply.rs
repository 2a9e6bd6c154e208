//! Applying and reverting a single ply
//!
//! `apply` and `undo` are exact inverses. The search relies on this pairing
//! to walk the game tree on one board without copying it.

use crate::board::{Board, Cell, PlayerId, Pos};
use crate::player::Players;

use super::{Goal, MoveModel, RuleSet};

/// Everything needed to revert one applied ply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an applied move must be undone with its token"]
pub struct UndoToken {
    target: Pos,
    /// Cell at `target` before the ply
    previous: Cell,
    /// Mover's position before the ply (tracked-position variants)
    from: Option<Pos>,
    /// Points added to the mover's score
    gained: i32,
}

impl UndoToken {
    pub fn target(&self) -> Pos {
        self.target
    }

    pub fn gained(&self) -> i32 {
        self.gained
    }
}

impl RuleSet {
    /// Immediate point gain for `side` taking `target`
    #[inline]
    pub fn value_of(&self, board: &Board, target: Pos) -> i32 {
        match self.goal {
            Goal::Collect => board[target].points(),
            Goal::Line { .. } => 0,
        }
    }

    /// Perform a legal ply. The caller guarantees legality.
    pub fn apply(
        &self,
        board: &mut Board,
        players: &mut Players,
        side: PlayerId,
        target: Pos,
    ) -> UndoToken {
        debug_assert_eq!(self.is_legal(board, players, side, target), Ok(()));

        let previous = board[target];
        let gained = self.value_of(board, target);
        let mut from = None;

        match (self.model, self.goal) {
            (MoveModel::DirectionalStep, _) => {
                let origin = players[side].pos;
                if let Some(origin) = origin {
                    board[origin] = Cell::Eaten;
                }
                board[target] = Cell::Occupied(side);
                players[side].pos = Some(target);
                from = origin;
            }
            (MoveModel::FreePlacement, Goal::Collect) => {
                board[target] = Cell::Eaten;
            }
            (MoveModel::FreePlacement, Goal::Line { .. }) => {
                board[target] = Cell::Occupied(side);
            }
        }
        players[side].score += gained;

        UndoToken {
            target,
            previous,
            from,
            gained,
        }
    }

    /// Restore the exact state from before the matching `apply`
    pub fn undo(&self, board: &mut Board, players: &mut Players, side: PlayerId, token: UndoToken) {
        debug_assert!(
            matches!(board[token.target], Cell::Eaten | Cell::Occupied(_)),
            "undo of {} that was never applied",
            token.target
        );

        board[token.target] = token.previous;
        if let Some(origin) = token.from {
            debug_assert_eq!(board[origin], Cell::Eaten, "apply/undo mismatch at {origin}");
            board[origin] = Cell::Occupied(side);
        }
        if self.model == MoveModel::DirectionalStep {
            players[side].pos = token.from;
        }
        players[side].score -= token.gained;
    }
}
