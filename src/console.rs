//! Text front end: board rendering and move prompts over any reader/writer
//!
//! Coordinates are entered 1-based as `row col`; steps as `w/a/s/d` or
//! `up/down/left/right`. `q` or end of input quits.

use std::io::{BufRead, Write};

use crate::board::{Board, PlayerId, Pos};
use crate::engine::MoveResult;
use crate::player::Players;
use crate::rules::{Direction, IllegalMove, MoveModel, RuleSet, TerminalStatus};
use crate::session::{HumanMove, MoveInput, Outcome, Renderer, SessionError};
use crate::tiles::TileSet;

/// Parsed line of human input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(HumanMove),
    Quit,
}

/// Parse one input line. Placement coordinates are 1-based.
pub fn parse_move(line: &str) -> Result<Command, IllegalMove> {
    let text = line.trim().to_ascii_lowercase();
    let malformed = || IllegalMove::Malformed(line.trim().to_string());

    let direction = match text.as_str() {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "w" | "up" => Some(Direction::Up),
        "a" | "left" => Some(Direction::Left),
        "s" | "down" => Some(Direction::Down),
        "d" | "right" => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = direction {
        return Ok(Command::Move(HumanMove::Step(direction)));
    }

    let mut parts = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let row: u8 = row.parse().map_err(|_| malformed())?;
    let col: u8 = col.parse().map_err(|_| malformed())?;
    if row == 0 || col == 0 {
        return Err(malformed());
    }
    Ok(Command::Move(HumanMove::Target(Pos::new(row - 1, col - 1))))
}

/// The same rejection with its cell shown in 1-based coordinates
pub fn one_based(reason: &IllegalMove) -> IllegalMove {
    let shift = |pos: &Pos| Pos::new(pos.row.saturating_add(1), pos.col.saturating_add(1));
    match reason {
        IllegalMove::OutOfBounds(pos) => IllegalMove::OutOfBounds(shift(pos)),
        IllegalMove::Obstacle(pos) => IllegalMove::Obstacle(shift(pos)),
        IllegalMove::Eaten(pos) => IllegalMove::Eaten(shift(pos)),
        IllegalMove::OpponentOccupied(pos) => IllegalMove::OpponentOccupied(shift(pos)),
        IllegalMove::Occupied(pos) => IllegalMove::Occupied(shift(pos)),
        IllegalMove::NotConsumable(pos) => IllegalMove::NotConsumable(shift(pos)),
        IllegalMove::NotAStep(pos) => IllegalMove::NotAStep(shift(pos)),
        other => other.clone(),
    }
}

/// Grid with one glyph per cell and 1-based row/column labels
pub fn render_board(board: &Board, players: &Players, tiles: &TileSet) -> String {
    let mut out = String::from("   ");
    for col in 1..=board.cols() {
        out.push_str(&format!("{col:>2} "));
    }
    out.push('\n');
    for row in 0..board.rows() {
        out.push_str(&format!("{:>2} ", row + 1));
        for &cell in board.row(row) {
            out.push_str(tiles.glyph(cell, players));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Writes the board, legend and scores as plain text
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_legend(&mut self, tiles: &TileSet, players: &Players) -> std::io::Result<()> {
        for spec in tiles.legend() {
            writeln!(self.out, "  {} {:<10} {:>2} pts", spec.glyph, spec.name, spec.points)?;
        }
        for player in players.iter() {
            writeln!(
                self.out,
                "  {} {:<10} {:>2}",
                player.glyph, player.name, player.score
            )?;
        }
        Ok(())
    }
}

// Rendering failures are not fatal to the game; the next prompt will
// surface a broken stream as an input error.
impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn show(&mut self, board: &Board, players: &Players, tiles: &TileSet) {
        let grid = render_board(board, players, tiles);
        let _ = writeln!(self.out, "\n{grid}");
        let _ = self.write_legend(tiles, players);
        let _ = self.out.flush();
    }

    fn reject(&mut self, reason: &IllegalMove) {
        let reason = one_based(reason);
        let _ = writeln!(self.out, "Invalid move: {reason}. Try again.");
    }

    fn computer_moved(&mut self, pos: Pos, result: &MoveResult) {
        let _ = writeln!(
            self.out,
            "Computer plays ({}, {})  [value {}, {} nodes, {} ms]",
            pos.row + 1,
            pos.col + 1,
            result.value,
            result.nodes,
            result.time_ms
        );
    }

    fn report(&mut self, outcome: &Outcome, players: &Players) {
        let [human, computer] = outcome.scores;
        let _ = match outcome.status {
            TerminalStatus::Won(id) => writeln!(
                self.out,
                "{} {} wins! ({human} - {computer})",
                players[id].glyph, players[id].name
            ),
            TerminalStatus::Tie => writeln!(self.out, "It's a tie! ({human} - {computer})"),
            TerminalStatus::Ongoing => Ok(()),
        };
        let _ = self.out.flush();
    }
}

/// Reads moves line by line, echoing a prompt to `out`
pub struct ConsoleInput<R: BufRead, W: Write> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, SessionError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> MoveInput for ConsoleInput<R, W> {
    fn next_move(
        &mut self,
        _board: &Board,
        players: &Players,
        rules: &RuleSet,
    ) -> Result<Option<HumanMove>, SessionError> {
        let human = &players[PlayerId::Human];
        let ask = match rules.model() {
            MoveModel::FreePlacement => "enter row and column",
            MoveModel::DirectionalStep => "move (w/a/s/d)",
        };
        let prompt = format!("{} {}, {ask}: ", human.glyph, human.name);
        loop {
            let Some(line) = self.read_line(&prompt)? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            return match parse_move(&line)? {
                Command::Quit => Ok(None),
                Command::Move(mv) => Ok(Some(mv)),
            };
        }
    }

    fn next_round(&mut self) -> Result<bool, SessionError> {
        let Some(line) = self.read_line("Play again? [Y/n] ")? else {
            return Ok(false);
        };
        Ok(!matches!(line.trim().to_ascii_lowercase().as_str(), "n" | "no" | "q"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(
            parse_move("1 3\n"),
            Ok(Command::Move(HumanMove::Target(Pos::new(0, 2))))
        );
        assert_eq!(
            parse_move(" 2,2 "),
            Ok(Command::Move(HumanMove::Target(Pos::new(1, 1))))
        );
    }

    #[test]
    fn test_parse_directions() {
        assert_eq!(parse_move("W"), Ok(Command::Move(HumanMove::Step(Direction::Up))));
        assert_eq!(parse_move("left"), Ok(Command::Move(HumanMove::Step(Direction::Left))));
        assert_eq!(parse_move("s"), Ok(Command::Move(HumanMove::Step(Direction::Down))));
        assert_eq!(parse_move("q"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_move("x y"), Err(IllegalMove::Malformed(_))));
        assert!(matches!(parse_move("1"), Err(IllegalMove::Malformed(_))));
        assert!(matches!(parse_move("1 2 3"), Err(IllegalMove::Malformed(_))));
        assert!(matches!(parse_move("0 1"), Err(IllegalMove::Malformed(_))));
        assert!(matches!(parse_move("2 0"), Err(IllegalMove::Malformed(_))));
    }

    #[test]
    fn test_rejections_name_cells_as_typed() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.reject(&IllegalMove::Occupied(Pos::new(0, 2)));
        renderer.reject(&IllegalMove::OutOfBounds(Pos::new(9, 9)));
        renderer.reject(&IllegalMove::OffEdge(Direction::Up));
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Invalid move: cell (1, 3) is already taken. Try again.");
        assert_eq!(lines[1], "Invalid move: coordinate (10, 10) is not valid. Try again.");
        let off_edge = IllegalMove::OffEdge(Direction::Up);
        assert_eq!(lines[2], format!("Invalid move: {off_edge}. Try again."));
    }

    #[test]
    fn test_one_based_shifts_only_cells() {
        let reason = IllegalMove::Eaten(Pos::new(1, 1));
        assert_eq!(one_based(&reason), IllegalMove::Eaten(Pos::new(2, 2)));
        assert_eq!(reason, IllegalMove::Eaten(Pos::new(1, 1)));
        assert_eq!(one_based(&IllegalMove::GameOver), IllegalMove::GameOver);
    }

    #[test]
    fn test_render_board() {
        let mut board = Board::new(2, 2);
        board[Pos::new(0, 0)] = Cell::Occupied(PlayerId::Human);
        board[Pos::new(1, 1)] = Cell::Eaten;
        let text = render_board(&board, &Players::fruit_duel(), &TileSet::fruit());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(" 1 🦸"));
        assert!(lines[2].contains("⬛"));
    }

    #[test]
    fn test_input_skips_blank_lines_and_quits_on_eof() {
        let rules = RuleSet::line(3, 3, 3).unwrap();
        let board = Board::new(3, 3);
        let players = Players::noughts_and_crosses();
        let mut input = ConsoleInput::new("\n2 2\n".as_bytes(), Vec::new());

        let mv = input.next_move(&board, &players, &rules).unwrap();
        assert_eq!(mv, Some(HumanMove::Target(Pos::new(1, 1))));
        assert_eq!(input.next_move(&board, &players, &rules).unwrap(), None);
    }
}
