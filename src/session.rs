//! Game session: turn order, permanent moves and end-of-game handling
//!
//! The session owns the single live board. Human moves come from a
//! [`MoveInput`] collaborator and are re-validated here; computer moves come
//! from the [`AIEngine`]. Both go through the same `RuleSet::apply`.

use derive_more::{Display, Error, From};
use tracing::{info, instrument, warn};

use crate::board::{Board, PlayerId, Pos};
use crate::config::{ConfigError, GameConfig};
use crate::engine::{AIEngine, MoveResult};
use crate::player::Players;
use crate::rules::{Direction, IllegalMove, MoveModel, RuleSet, TerminalStatus, TurnOrder};
use crate::setup::BoardGenerator;
use crate::tiles::TileSet;

/// A move as entered by the human, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanMove {
    /// Explicit target cell (placement variants, or an adjacent cell)
    Target(Pos),
    /// One step from the current position (step variants)
    Step(Direction),
}

/// Final result of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: TerminalStatus,
    /// Scores in seat order (human, computer)
    pub scores: [i32; 2],
}

/// Session failure
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    #[display("{_0}")]
    Illegal(IllegalMove),
    #[display("{_0}")]
    Config(ConfigError),
    #[display("input error: {_0}")]
    Io(std::io::Error),
}

/// Source of human moves
pub trait MoveInput {
    /// Next raw move, or `None` when the player quits.
    ///
    /// Unparseable input should be reported as
    /// `SessionError::Illegal(IllegalMove::Malformed(..))`; the session
    /// shows the reason and asks again.
    fn next_move(
        &mut self,
        board: &Board,
        players: &Players,
        rules: &RuleSet,
    ) -> Result<Option<HumanMove>, SessionError>;

    /// Whether to play another round after a game ends
    fn next_round(&mut self) -> Result<bool, SessionError> {
        Ok(true)
    }
}

/// Read-only consumer of session state
pub trait Renderer {
    fn show(&mut self, board: &Board, players: &Players, tiles: &TileSet);
    fn reject(&mut self, reason: &IllegalMove);
    fn computer_moved(&mut self, _pos: Pos, _result: &MoveResult) {}
    fn report(&mut self, outcome: &Outcome, players: &Players);
}

/// A running game
pub struct GameSession {
    config: GameConfig,
    rules: RuleSet,
    tiles: TileSet,
    generator: BoardGenerator,
    engine: AIEngine,
    board: Board,
    players: Players,
    side_to_move: PlayerId,
    status: TerminalStatus,
    history: Vec<(PlayerId, Pos)>,
    rounds: u32,
    /// Fruit on the board plus both scores; constant within a round
    points_in_play: i32,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = config.rule_set()?;
        let tiles = config.tiles();
        let mut players = config.players();
        let mut generator = BoardGenerator::new(config.seed);
        let board = generator.generate(&config, &tiles, &mut players)?;

        let mut session = Self {
            engine: AIEngine::new(rules),
            config,
            rules,
            tiles,
            generator,
            board,
            players,
            side_to_move: PlayerId::Human,
            status: TerminalStatus::Ongoing,
            history: Vec::new(),
            rounds: 1,
            points_in_play: 0,
        };
        session.begin_round();
        Ok(session)
    }

    /// Session over a prepared position (tests, puzzles)
    pub fn from_position(
        config: GameConfig,
        board: Board,
        players: Players,
        side_to_move: PlayerId,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if (board.rows(), board.cols()) != (config.rows, config.cols) {
            return Err(ConfigError::PositionSize {
                rows: board.rows(),
                cols: board.cols(),
                expected_rows: config.rows,
                expected_cols: config.cols,
            });
        }
        let rules = config.rule_set()?;

        let mut session = Self {
            engine: AIEngine::new(rules),
            tiles: config.tiles(),
            generator: BoardGenerator::new(config.seed),
            config,
            rules,
            board,
            players,
            side_to_move,
            status: TerminalStatus::Ongoing,
            history: Vec::new(),
            rounds: 1,
            points_in_play: 0,
        };
        session.points_in_play = session.count_points();
        session.status = session.evaluate_status();
        Ok(session)
    }

    fn begin_round(&mut self) {
        self.history.clear();
        let solo = self.rules.turns() == TurnOrder::Solo;
        self.side_to_move = if self.config.computer_first || solo {
            PlayerId::Computer
        } else {
            PlayerId::Human
        };
        self.points_in_play = self.count_points();
        self.status = self.evaluate_status();
        info!(
            variant = %self.config.variant,
            rows = self.config.rows,
            cols = self.config.cols,
            seed = ?self.config.seed,
            round = self.rounds,
            first = %self.side_to_move,
            "game started"
        );
    }

    fn count_points(&self) -> i32 {
        let on_board: i32 = self.board.iter().map(|(_, cell)| cell.points()).sum();
        on_board + self.players.scores().iter().sum::<i32>()
    }

    fn evaluate_status(&self) -> TerminalStatus {
        self.rules
            .is_terminal(&self.board, &self.players, self.side_to_move)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn side_to_move(&self) -> PlayerId {
        self.side_to_move
    }

    pub fn status(&self) -> TerminalStatus {
        self.status
    }

    pub fn history(&self) -> &[(PlayerId, Pos)] {
        &self.history
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn last_move(&self) -> Option<(PlayerId, Pos)> {
        self.history.last().copied()
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.status.is_over().then(|| Outcome {
            status: self.status,
            scores: self.players.scores(),
        })
    }

    /// Copies of the live state for a search running elsewhere
    pub fn snapshot(&self) -> (Board, Players) {
        (self.board.clone(), self.players.clone())
    }

    /// Turn a raw human move into a legal target
    pub fn resolve(&self, mv: HumanMove) -> Result<Pos, IllegalMove> {
        let side = PlayerId::Human;
        match (mv, self.rules.model()) {
            (HumanMove::Step(direction), MoveModel::DirectionalStep) => {
                self.rules
                    .step_target(&self.board, &self.players, side, direction)
            }
            (HumanMove::Step(_), MoveModel::FreePlacement) => {
                Err(IllegalMove::WrongMoveKind("board coordinates"))
            }
            (HumanMove::Target(pos), _) => {
                self.rules.is_legal(&self.board, &self.players, side, pos)?;
                Ok(pos)
            }
        }
    }

    fn check_turn(&self, side: PlayerId) -> Result<(), IllegalMove> {
        if self.status.is_over() {
            return Err(IllegalMove::GameOver);
        }
        if self.side_to_move != side {
            return Err(IllegalMove::NotYourTurn);
        }
        Ok(())
    }

    /// Validate and apply a human move
    pub fn play_human(&mut self, mv: HumanMove) -> Result<Pos, SessionError> {
        self.check_turn(PlayerId::Human)?;
        let target = self.resolve(mv)?;
        self.commit(PlayerId::Human, target);
        Ok(target)
    }

    /// Search and apply the computer's move
    pub fn play_computer(&mut self) -> Result<MoveResult, SessionError> {
        self.check_turn(PlayerId::Computer)?;
        let result =
            self.engine
                .get_move_with_stats(&mut self.board, &mut self.players, PlayerId::Computer);
        self.commit_computer(&result)?;
        Ok(result)
    }

    /// Apply a computer move found by a search run on a snapshot
    pub fn commit_computer(&mut self, result: &MoveResult) -> Result<Pos, SessionError> {
        self.check_turn(PlayerId::Computer)?;
        // Only terminal positions have no move, and those were rejected above
        let Some(target) = result.best_move else {
            unreachable!("search returned no move at a non-terminal position");
        };
        self.rules
            .is_legal(&self.board, &self.players, PlayerId::Computer, target)?;
        self.commit(PlayerId::Computer, target);
        Ok(target)
    }

    /// Apply a legal move permanently and advance the turn
    fn commit(&mut self, side: PlayerId, target: Pos) {
        let eaten = self.rules.value_of(&self.board, target);
        // Permanent: the undo token is dropped
        let _ = self.rules.apply(&mut self.board, &mut self.players, side, target);
        self.history.push((side, target));
        debug_assert_eq!(self.count_points(), self.points_in_play, "points were not conserved");
        self.side_to_move = self.rules.next_side(side);
        self.status = self.evaluate_status();

        info!(
            side = %side,
            row = target.row,
            col = target.col,
            points = eaten,
            score = self.players[side].score,
            "move applied"
        );
        if let Some(outcome) = self.outcome() {
            info!(status = ?outcome.status, scores = ?outcome.scores, "game over");
        }
    }

    /// Start a new round on a freshly generated board
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.board = self
            .generator
            .generate(&self.config, &self.tiles, &mut self.players)?;
        self.rounds += 1;
        self.begin_round();
        Ok(())
    }

    /// Play until the game ends (or, with `restart`, until the input quits)
    #[instrument(skip_all)]
    pub fn run(
        &mut self,
        input: &mut dyn MoveInput,
        renderer: &mut dyn Renderer,
    ) -> Result<(), SessionError> {
        loop {
            renderer.show(&self.board, &self.players, &self.tiles);

            if let Some(outcome) = self.outcome() {
                renderer.report(&outcome, &self.players);
                if self.config.restart && input.next_round()? {
                    self.restart()?;
                    continue;
                }
                return Ok(());
            }

            match self.side_to_move {
                PlayerId::Computer => {
                    let result = self.play_computer()?;
                    if let Some((_, pos)) = self.last_move() {
                        renderer.computer_moved(pos, &result);
                    }
                }
                PlayerId::Human => loop {
                    let attempt = input
                        .next_move(&self.board, &self.players, &self.rules)
                        .and_then(|mv| match mv {
                            Some(mv) => self.play_human(mv).map(Some),
                            None => Ok(None),
                        });
                    match attempt {
                        Ok(Some(_)) => break,
                        Ok(None) => {
                            info!("player quit");
                            return Ok(());
                        }
                        Err(SessionError::Illegal(reason)) => {
                            warn!(%reason, "rejected human move");
                            renderer.reject(&reason);
                        }
                        Err(err) => return Err(err),
                    }
                },
            }
        }
    }
}
