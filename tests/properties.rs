//! Seeded random checks of the search and rule invariants

use grid_duel::board::{Board, Cell, PlayerId, Pos, TileKind};
use grid_duel::player::Players;
use grid_duel::rules::{MoveModel, RuleSet, Scoring, TerminalStatus, TurnOrder};
use grid_duel::search::{Searcher, LOSS, WIN};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

struct Position {
    rules: RuleSet,
    board: Board,
    players: Players,
    side: PlayerId,
}

fn random_fruit(rng: &mut StdRng) -> Cell {
    Cell::Fruit {
        kind: TileKind(rng.gen_range(0..4)),
        points: rng.gen_range(1..=4),
    }
}

fn random_harvest(rng: &mut StdRng, turns: TurnOrder) -> Position {
    let (rows, cols) = (2, 3);
    let rules = RuleSet::harvest(rows, cols, turns).unwrap();
    let cells = (0..rows as usize * cols as usize)
        .map(|_| match rng.gen_range(0..10) {
            0 => Cell::Obstacle,
            1 => Cell::Eaten,
            _ => random_fruit(rng),
        })
        .collect();
    let side = match turns {
        TurnOrder::Solo => PlayerId::Computer,
        TurnOrder::Alternating => *PlayerId::ALL.choose(rng).unwrap(),
    };
    Position {
        rules,
        board: Board::from_cells(rows, cols, cells).unwrap(),
        players: Players::fruit_duel(),
        side,
    }
}

fn random_duel(rng: &mut StdRng) -> Position {
    let (rows, cols) = (3, 4);
    let rules = RuleSet::fruit_duel(rows, cols).unwrap();
    let cells = (0..rows as usize * cols as usize)
        .map(|_| match rng.gen_range(0..10) {
            0 => Cell::Obstacle,
            1 => Cell::Eaten,
            2 => Cell::Empty,
            _ => random_fruit(rng),
        })
        .collect();
    let mut board = Board::from_cells(rows, cols, cells).unwrap();
    let mut players = Players::fruit_duel();

    let mut spots: Vec<Pos> = board.positions().collect();
    spots.shuffle(rng);
    for (id, pos) in PlayerId::ALL.into_iter().zip(spots) {
        board[pos] = Cell::Occupied(id);
        players[id].pos = Some(pos);
        players[id].score = rng.gen_range(0..4);
    }
    Position {
        rules,
        board,
        players,
        side: *PlayerId::ALL.choose(rng).unwrap(),
    }
}

fn random_line(rng: &mut StdRng) -> Position {
    let rules = RuleSet::line(3, 3, 3).unwrap();
    let mut board = Board::new(3, 3);
    let mut spots: Vec<Pos> = board.positions().collect();
    spots.shuffle(rng);

    let marks = rng.gen_range(2..=6);
    let mut side = PlayerId::Human;
    for pos in spots.into_iter().take(marks) {
        board[pos] = Cell::Occupied(side);
        side = side.opponent();
    }
    Position {
        rules,
        board,
        players: Players::noughts_and_crosses(),
        side,
    }
}

fn random_position(rng: &mut StdRng) -> Position {
    match rng.gen_range(0..4) {
        0 => random_harvest(rng, TurnOrder::Alternating),
        1 => random_harvest(rng, TurnOrder::Solo),
        2 => random_duel(rng),
        _ => random_line(rng),
    }
}

/// Plain minimax with the same move order and tie-break, no pruning
fn minimax(
    rules: &RuleSet,
    board: &mut Board,
    players: &mut Players,
    side: PlayerId,
) -> (i32, Option<Pos>) {
    let status = rules.is_terminal(board, players, side);
    if status.is_over() {
        let value = match (rules.scoring(), status) {
            (Scoring::Outcome, TerminalStatus::Won(PlayerId::Computer)) => WIN,
            (Scoring::Outcome, TerminalStatus::Won(PlayerId::Human)) => LOSS,
            _ => 0,
        };
        return (value, None);
    }

    let maximizing = side == PlayerId::Computer;
    let moves: Vec<Pos> = rules.legal_moves(board, players, side).collect();
    let mut best: Option<(i32, Pos)> = None;
    for mv in moves {
        let gain = match rules.scoring() {
            Scoring::Accumulate if maximizing => rules.value_of(board, mv),
            Scoring::Accumulate => -rules.value_of(board, mv),
            Scoring::Outcome => 0,
        };
        let token = rules.apply(board, players, side, mv);
        let (child, _) = minimax(rules, board, players, rules.next_side(side));
        rules.undo(board, players, side, token);

        let value = child + gain;
        let better = match best {
            None => true,
            Some((b, _)) if maximizing => value > b,
            Some((b, _)) => value < b,
        };
        if better {
            best = Some((value, mv));
        }
    }
    let (value, mv) = best.expect("non-terminal position has a move");
    (value, Some(mv))
}

#[test]
fn test_pruning_matches_plain_minimax() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..120 {
        let mut pos = random_position(&mut rng);
        let expected = minimax(&pos.rules, &mut pos.board, &mut pos.players, pos.side);
        let result = Searcher::new(&pos.rules).search(&mut pos.board, &mut pos.players, pos.side);
        assert_eq!(
            (result.value, result.best_move),
            expected,
            "round {round}: {:?}",
            pos.board
        );
    }
}

#[test]
fn test_search_restores_position() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..60 {
        let mut pos = random_position(&mut rng);
        let before = (pos.board.clone(), pos.players.clone());
        Searcher::new(&pos.rules).search(&mut pos.board, &mut pos.players, pos.side);
        assert_eq!((pos.board, pos.players), before);
    }
}

#[test]
fn test_apply_undo_round_trip_along_random_games() {
    let occupied = |board: &Board| board.count(|c| matches!(c, Cell::Occupied(_)));
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..60 {
        let mut pos = random_position(&mut rng);
        let mut side = pos.side;
        loop {
            let status = pos.rules.is_terminal(&pos.board, &pos.players, side);
            assert_eq!(status, pos.rules.is_terminal(&pos.board, &pos.players, side));
            if status.is_over() {
                break;
            }

            let moves: Vec<Pos> = pos.rules.legal_moves(&pos.board, &pos.players, side).collect();
            let walking = pos.rules.model() == MoveModel::DirectionalStep;
            for &mv in &moves {
                let before = (pos.board.clone(), pos.players.clone());
                let walkers = occupied(&pos.board);
                let token = pos.rules.apply(&mut pos.board, &mut pos.players, side, mv);
                if walking {
                    assert_eq!(occupied(&pos.board), 2);
                }
                pos.rules.undo(&mut pos.board, &mut pos.players, side, token);
                assert_eq!(occupied(&pos.board), walkers);
                assert_eq!((pos.board.clone(), pos.players.clone()), before);
            }

            let mv = *moves.choose(&mut rng).unwrap();
            let _ = pos.rules.apply(&mut pos.board, &mut pos.players, side, mv);
            if walking {
                assert_eq!(occupied(&pos.board), 2);
            }
            side = pos.rules.next_side(side);
        }
    }
}

#[test]
fn test_points_are_conserved_during_collection() {
    let fruit_points = |board: &Board| -> i32 {
        board.iter().map(|(_, cell)| match cell {
            Cell::Fruit { points, .. } => points,
            _ => 0,
        }).sum()
    };

    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..80 {
        let mut pos = match rng.gen_range(0..2) {
            0 => random_duel(&mut rng),
            _ => random_harvest(&mut rng, TurnOrder::Alternating),
        };
        let total = fruit_points(&pos.board) + pos.players.scores().iter().sum::<i32>();
        let mut side = pos.side;

        while !pos.rules.is_terminal(&pos.board, &pos.players, side).is_over() {
            let moves: Vec<Pos> = pos.rules.legal_moves(&pos.board, &pos.players, side).collect();
            let mv = *moves.choose(&mut rng).unwrap();
            let gained = pos.rules.value_of(&pos.board, mv);
            let before = pos.players[side].score;

            let _ = pos.rules.apply(&mut pos.board, &mut pos.players, side, mv);
            assert_eq!(pos.players[side].score, before + gained);
            assert_eq!(
                fruit_points(&pos.board) + pos.players.scores().iter().sum::<i32>(),
                total
            );
            side = pos.rules.next_side(side);
        }
    }
}

#[test]
fn test_walking_leaves_eaten_cells_behind() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..40 {
        let mut pos = random_duel(&mut rng);
        let mut side = pos.side;
        while !pos.rules.is_terminal(&pos.board, &pos.players, side).is_over() {
            let from = pos.players[side].pos.unwrap();
            let moves: Vec<Pos> = pos.rules.legal_moves(&pos.board, &pos.players, side).collect();
            let mv = *moves.choose(&mut rng).unwrap();
            assert_eq!(from.distance(mv), 1);

            let _ = pos.rules.apply(&mut pos.board, &mut pos.players, side, mv);
            assert_eq!(pos.board[from], Cell::Eaten);
            assert_eq!(pos.board[mv], Cell::Occupied(side));
            assert_eq!(pos.board.position_of(side), Some(mv));
            assert_eq!(pos.board.count(|c| matches!(c, Cell::Occupied(_))), 2);
            side = pos.rules.next_side(side);
        }
    }
}
