//! Move legality and lazy legal-move generation
//!
//! Candidates are produced in row-major order for both move models, which
//! fixes the search's tie-break. Generation is driven by a [`MoveCursor`]
//! that borrows nothing, so the search can mutate the board between
//! candidates (every apply is undone before the next call).

use crate::board::{Board, Cell, PlayerId, Pos};
use crate::player::Players;

use super::{Direction, Goal, IllegalMove, MoveModel, RuleSet};

/// Resumable position in a legal-move enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveCursor(usize);

impl RuleSet {
    /// Check a candidate target for `side`, reporting the violated rule
    pub fn is_legal(
        &self,
        board: &Board,
        players: &Players,
        side: PlayerId,
        target: Pos,
    ) -> Result<(), IllegalMove> {
        let cell = board
            .get(target)
            .map_err(|_| IllegalMove::OutOfBounds(target))?;

        match self.model {
            MoveModel::FreePlacement => self.placement_target(cell, target),
            MoveModel::DirectionalStep => {
                let from = players[side].pos.ok_or(IllegalMove::NotAStep(target))?;
                if from.distance(target) != 1 {
                    return Err(IllegalMove::NotAStep(target));
                }
                step_target(cell, side, target)
            }
        }
    }

    /// Resolve a step direction into a legal target cell
    pub fn step_target(
        &self,
        board: &Board,
        players: &Players,
        side: PlayerId,
        direction: Direction,
    ) -> Result<Pos, IllegalMove> {
        if self.model != MoveModel::DirectionalStep {
            return Err(IllegalMove::WrongMoveKind("board coordinates"));
        }
        let from = players[side]
            .pos
            .ok_or(IllegalMove::WrongMoveKind("board coordinates"))?;
        let (dr, dc) = direction.delta();
        let target = from
            .offset(dr, dc)
            .filter(|&p| board.contains(p))
            .ok_or(IllegalMove::OffEdge(direction))?;
        self.is_legal(board, players, side, target)?;
        Ok(target)
    }

    fn placement_target(&self, cell: Cell, target: Pos) -> Result<(), IllegalMove> {
        match (self.goal, cell) {
            (Goal::Collect, Cell::Fruit { .. }) => Ok(()),
            (Goal::Line { .. }, Cell::Empty) => Ok(()),
            (_, Cell::Obstacle) => Err(IllegalMove::Obstacle(target)),
            (_, Cell::Eaten) => Err(IllegalMove::Eaten(target)),
            (_, Cell::Occupied(_)) => Err(IllegalMove::Occupied(target)),
            (Goal::Collect, Cell::Empty) => Err(IllegalMove::NotConsumable(target)),
            // Fruit on a line board is never placed by the generator
            (Goal::Line { .. }, Cell::Fruit { .. }) => Err(IllegalMove::Occupied(target)),
        }
    }

    /// Next legal target after `cursor`, advancing it
    pub fn next_legal(
        &self,
        board: &Board,
        players: &Players,
        side: PlayerId,
        cursor: &mut MoveCursor,
    ) -> Option<Pos> {
        match self.model {
            MoveModel::FreePlacement => {
                while cursor.0 < board.len() {
                    let pos = board.from_index(cursor.0);
                    cursor.0 += 1;
                    if self.placement_target(board[pos], pos).is_ok() {
                        return Some(pos);
                    }
                }
                None
            }
            MoveModel::DirectionalStep => {
                let from = players[side].pos?;
                while cursor.0 < Direction::ALL.len() {
                    let (dr, dc) = Direction::ALL[cursor.0].delta();
                    cursor.0 += 1;
                    match from.offset(dr, dc) {
                        Some(target) if board.contains(target) => {
                            if step_target(board[target], side, target).is_ok() {
                                return Some(target);
                            }
                        }
                        _ => {}
                    }
                }
                None
            }
        }
    }

    /// Lazy row-major sequence of legal targets
    pub fn legal_moves<'a>(
        &'a self,
        board: &'a Board,
        players: &'a Players,
        side: PlayerId,
    ) -> LegalMoves<'a> {
        LegalMoves {
            rules: self,
            board,
            players,
            side,
            cursor: MoveCursor::default(),
        }
    }

    #[inline]
    pub fn has_legal_move(&self, board: &Board, players: &Players, side: PlayerId) -> bool {
        self.next_legal(board, players, side, &mut MoveCursor::default())
            .is_some()
    }
}

fn step_target(cell: Cell, side: PlayerId, target: Pos) -> Result<(), IllegalMove> {
    match cell {
        Cell::Fruit { .. } | Cell::Empty => Ok(()),
        Cell::Obstacle => Err(IllegalMove::Obstacle(target)),
        Cell::Eaten => Err(IllegalMove::Eaten(target)),
        Cell::Occupied(player) if player != side => Err(IllegalMove::OpponentOccupied(target)),
        Cell::Occupied(_) => Err(IllegalMove::Occupied(target)),
    }
}

/// Iterator over legal targets for one side
pub struct LegalMoves<'a> {
    rules: &'a RuleSet,
    board: &'a Board,
    players: &'a Players,
    side: PlayerId,
    cursor: MoveCursor,
}

impl Iterator for LegalMoves<'_> {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        self.rules
            .next_legal(self.board, self.players, self.side, &mut self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileKind;
    use crate::rules::TurnOrder;

    fn fruit(points: i32) -> Cell {
        Cell::Fruit {
            kind: TileKind(0),
            points,
        }
    }

    /// 3x3 duel board:
    /// ```text
    /// H  4  #
    /// 1  x  2
    /// 3  C  1
    /// ```
    fn duel() -> (RuleSet, Board, Players) {
        let rules = RuleSet::fruit_duel(3, 3).unwrap();
        let cells = vec![
            Cell::Occupied(PlayerId::Human),
            fruit(4),
            Cell::Obstacle,
            fruit(1),
            Cell::Eaten,
            fruit(2),
            fruit(3),
            Cell::Occupied(PlayerId::Computer),
            fruit(1),
        ];
        let board = Board::from_cells(3, 3, cells).unwrap();
        let mut players = Players::fruit_duel();
        players[PlayerId::Human].pos = Some(Pos::new(0, 0));
        players[PlayerId::Computer].pos = Some(Pos::new(2, 1));
        (rules, board, players)
    }

    #[test]
    fn test_step_legality_reasons() {
        let (rules, mut board, mut players) = duel();
        let human = PlayerId::Human;
        assert_eq!(rules.is_legal(&board, &players, human, Pos::new(0, 1)), Ok(()));
        assert_eq!(
            rules.is_legal(&board, &players, human, Pos::new(1, 1)),
            Err(IllegalMove::NotAStep(Pos::new(1, 1)))
        );
        assert_eq!(
            rules.is_legal(&board, &players, human, Pos::new(5, 0)),
            Err(IllegalMove::OutOfBounds(Pos::new(5, 0)))
        );

        // Move the human next to the obstacle, the eaten cell and the opponent
        board[Pos::new(0, 0)] = Cell::Eaten;
        board[Pos::new(1, 2)] = Cell::Occupied(human);
        players[human].pos = Some(Pos::new(1, 2));
        assert_eq!(
            rules.is_legal(&board, &players, human, Pos::new(0, 2)),
            Err(IllegalMove::Obstacle(Pos::new(0, 2)))
        );
        assert_eq!(
            rules.is_legal(&board, &players, human, Pos::new(1, 1)),
            Err(IllegalMove::Eaten(Pos::new(1, 1)))
        );

        players[PlayerId::Computer].pos = Some(Pos::new(2, 2));
        board[Pos::new(2, 1)] = Cell::Eaten;
        board[Pos::new(2, 2)] = Cell::Occupied(PlayerId::Computer);
        assert_eq!(
            rules.is_legal(&board, &players, human, Pos::new(2, 2)),
            Err(IllegalMove::OpponentOccupied(Pos::new(2, 2)))
        );
    }

    #[test]
    fn test_step_moves_row_major() {
        let (rules, board, players) = duel();
        let human: Vec<Pos> = rules.legal_moves(&board, &players, PlayerId::Human).collect();
        assert_eq!(human, vec![Pos::new(0, 1), Pos::new(1, 0)]);

        let computer: Vec<Pos> = rules
            .legal_moves(&board, &players, PlayerId::Computer)
            .collect();
        // (1, 1) is eaten
        assert_eq!(computer, vec![Pos::new(2, 0), Pos::new(2, 2)]);
    }

    #[test]
    fn test_step_target_direction() {
        let (rules, board, players) = duel();
        assert_eq!(
            rules.step_target(&board, &players, PlayerId::Human, Direction::Right),
            Ok(Pos::new(0, 1))
        );
        assert!(matches!(
            rules.step_target(&board, &players, PlayerId::Human, Direction::Up),
            Err(IllegalMove::OffEdge(Direction::Up))
        ));
        assert_eq!(
            rules.step_target(&board, &players, PlayerId::Computer, Direction::Up),
            Err(IllegalMove::Eaten(Pos::new(1, 1)))
        );
    }

    #[test]
    fn test_placement_collect_targets_fruit_only() {
        let (_, board, players) = duel();
        let rules = RuleSet::harvest(3, 3, TurnOrder::Alternating).unwrap();
        let moves: Vec<Pos> = rules.legal_moves(&board, &players, PlayerId::Human).collect();
        assert_eq!(
            moves,
            vec![
                Pos::new(0, 1),
                Pos::new(1, 0),
                Pos::new(1, 2),
                Pos::new(2, 0),
                Pos::new(2, 2)
            ]
        );
        assert_eq!(
            rules.is_legal(&board, &players, PlayerId::Human, Pos::new(0, 2)),
            Err(IllegalMove::Obstacle(Pos::new(0, 2)))
        );
        assert!(rules
            .step_target(&board, &players, PlayerId::Human, Direction::Down)
            .is_err());
    }

    #[test]
    fn test_placement_line_targets_empty_only() {
        let rules = RuleSet::line(2, 2, 2).unwrap();
        let mut board = Board::new(2, 2);
        let players = Players::noughts_and_crosses();
        board[Pos::new(0, 1)] = Cell::Occupied(PlayerId::Computer);

        assert_eq!(
            rules.is_legal(&board, &players, PlayerId::Human, Pos::new(0, 1)),
            Err(IllegalMove::Occupied(Pos::new(0, 1)))
        );
        assert_eq!(rules.legal_moves(&board, &players, PlayerId::Human).count(), 3);
    }

    #[test]
    fn test_cursor_survives_mutation() {
        let rules = RuleSet::line(1, 3, 3).unwrap();
        let mut board = Board::new(1, 3);
        let players = Players::noughts_and_crosses();
        let mut cursor = MoveCursor::default();

        let first = rules.next_legal(&board, &players, PlayerId::Human, &mut cursor);
        assert_eq!(first, Some(Pos::new(0, 0)));
        board[Pos::new(0, 0)] = Cell::Occupied(PlayerId::Human);
        board[Pos::new(0, 0)] = Cell::Empty;
        let second = rules.next_legal(&board, &players, PlayerId::Human, &mut cursor);
        assert_eq!(second, Some(Pos::new(0, 1)));
    }
}
