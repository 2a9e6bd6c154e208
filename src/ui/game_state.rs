//! Game state management for the Grid Duel GUI
//!
//! Wraps a [`GameSession`] and runs the computer's search on a background
//! thread. The worker gets its own copy of the board and players and
//! searches that copy with apply/undo, so the live board is never touched
//! while a search is running and the window keeps repainting it.
//!
//! The console path has no such thread: [`GameSession::play_computer`]
//! searches the live board in place, which the session's apply/undo
//! discipline leaves exactly as it was before the chosen move is committed.

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::board::{PlayerId, Pos};
use crate::config::{ConfigError, GameConfig};
use crate::engine::{AIEngine, MoveResult};
use crate::rules::{find_line, Direction, Goal, IllegalMove, MoveModel, TerminalStatus};
use crate::session::{GameSession, HumanMove, SessionError};

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<MoveResult>,
        start_time: Instant,
    },
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn set_ai_time(&mut self, duration: Duration) {
        self.ai_thinking_time = Some(duration);
    }
}

/// Main game state
pub struct GameState {
    pub session: GameSession,
    pub last_ai_result: Option<MoveResult>,
    pub ai_state: AiState,
    pub move_timer: MoveTimer,
    pub message: Option<String>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            session: GameSession::new(config)?,
            last_ai_result: None,
            ai_state: AiState::Idle,
            move_timer: MoveTimer::default(),
            message: None,
        })
    }

    /// Fresh board with the same configuration
    pub fn reset(&mut self) {
        if let Err(err) = self.session.restart() {
            warn!(%err, "could not start a new round");
            self.message = Some(err.to_string());
            return;
        }
        self.last_ai_result = None;
        self.ai_state = AiState::Idle;
        self.move_timer = MoveTimer::default();
        self.message = None;
    }

    pub fn is_human_turn(&self) -> bool {
        !self.session.is_over() && self.session.side_to_move() == PlayerId::Human
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.session.is_over() && self.session.side_to_move() == PlayerId::Computer
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Whether the human may take `pos` right now
    pub fn is_playable(&self, pos: Pos) -> bool {
        self.is_human_turn()
            && !self.is_ai_thinking()
            && self.session.resolve(self.click(pos)).is_ok()
    }

    /// Move for a clicked cell: a step when it neighbours the walker
    pub fn click(&self, pos: Pos) -> HumanMove {
        let session = &self.session;
        match (session.rules().model(), session.players()[PlayerId::Human].pos) {
            (MoveModel::DirectionalStep, Some(from)) => {
                Direction::between(from, pos).map_or(HumanMove::Target(pos), HumanMove::Step)
            }
            _ => HumanMove::Target(pos),
        }
    }

    /// Attempt a human move
    pub fn try_play(&mut self, mv: HumanMove) -> Result<Pos, SessionError> {
        if self.is_ai_thinking() {
            return Err(IllegalMove::NotYourTurn.into());
        }
        let pos = self.session.play_human(mv).map_err(|err| {
            warn!(%err, "rejected human move");
            self.message = Some(err.to_string());
            err
        })?;
        self.message = None;
        self.move_timer.start();
        Ok(pos)
    }

    /// Start the search on a background thread
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() {
            return;
        }

        let (mut board, mut players) = self.session.snapshot();
        let rules = *self.session.rules();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let mut engine = AIEngine::new(rules);
            let result = engine.get_move_with_stats(&mut board, &mut players, PlayerId::Computer);
            let _ = tx.send(result);
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Apply the search result once the worker is done
    pub fn check_ai_result(&mut self) {
        let result = match &self.ai_state {
            AiState::Thinking {
                receiver,
                start_time,
            } => match receiver.try_recv() {
                Ok(result) => Some((result, start_time.elapsed())),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.ai_state = AiState::Idle;
                    self.message = Some("AI error".to_string());
                    return;
                }
            },
            AiState::Idle => None,
        };

        if let Some((move_result, elapsed)) = result {
            self.ai_state = AiState::Idle;
            self.move_timer.set_ai_time(elapsed);
            if let Err(err) = self.session.commit_computer(&move_result) {
                self.message = Some(err.to_string());
            }
            self.last_ai_result = Some(move_result);
            self.move_timer.start();
        }
    }

    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Cells of the completed line, for highlighting
    pub fn winning_line(&self) -> Option<Vec<Pos>> {
        let TerminalStatus::Won(winner) = self.session.status() else {
            return None;
        };
        match self.session.rules().goal() {
            Goal::Line { length } => find_line(self.session.board(), winner, length),
            Goal::Collect => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::config::Variant;

    fn wait_for_ai(state: &mut GameState) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while state.is_ai_thinking() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
            state.check_ai_result();
        }
    }

    #[test]
    fn test_background_search_commits_move() {
        let mut state = GameState::new(GameConfig::for_variant(Variant::Line)).unwrap();
        assert!(state.is_human_turn());
        state.try_play(HumanMove::Target(Pos::new(1, 1))).unwrap();
        assert!(state.is_ai_turn());

        state.start_ai_thinking();
        assert!(state.is_ai_thinking());
        wait_for_ai(&mut state);

        assert!(!state.is_ai_thinking());
        assert!(state.last_ai_result.is_some());
        assert!(state.move_timer.ai_thinking_time.is_some());
        assert_eq!(state.session.history().len(), 2);
        assert!(state.is_human_turn());
    }

    #[test]
    fn test_live_board_untouched_while_thinking() {
        let mut config = GameConfig::for_variant(Variant::Line);
        config.computer_first = true;
        let mut state = GameState::new(config).unwrap();
        let (board, players) = state.session.snapshot();

        state.start_ai_thinking();
        assert_eq!(state.session.board(), &board);
        assert_eq!(state.session.players(), &players);
        wait_for_ai(&mut state);

        let mv = state.last_ai_result.as_ref().and_then(|r| r.best_move).unwrap();
        assert_eq!(state.session.history(), &[(PlayerId::Computer, mv)]);
        let computer = Cell::Occupied(PlayerId::Computer);
        assert_eq!(board.count(|c| c == computer), 0);
        assert_eq!(state.session.board().count(|c| c == computer), 1);
        assert_eq!(state.session.board()[mv], computer);
    }

    #[test]
    fn test_rejected_click_sets_message() {
        let mut state = GameState::new(GameConfig::for_variant(Variant::Line)).unwrap();
        state.try_play(HumanMove::Target(Pos::new(0, 0))).unwrap();
        state.start_ai_thinking();
        wait_for_ai(&mut state);

        assert!(!state.is_playable(Pos::new(0, 0)));
        assert!(state.try_play(HumanMove::Target(Pos::new(0, 0))).is_err());
        assert!(state.message.is_some());
    }

    #[test]
    fn test_click_next_to_walker_is_a_step() {
        let mut config = GameConfig::for_variant(Variant::Fruit);
        config.seed = Some(2);
        let state = GameState::new(config).unwrap();
        // Human starts in the top-right corner of the 4x4 board
        assert_eq!(state.click(Pos::new(1, 3)), HumanMove::Step(Direction::Down));
        assert_eq!(state.click(Pos::new(0, 2)), HumanMove::Step(Direction::Left));
        assert_eq!(state.click(Pos::new(3, 0)), HumanMove::Target(Pos::new(3, 0)));
    }

    #[test]
    fn test_reset_drops_pending_search() {
        let mut config = GameConfig::for_variant(Variant::Line);
        config.computer_first = true;
        let mut state = GameState::new(config).unwrap();
        state.start_ai_thinking();
        state.reset();
        assert!(!state.is_ai_thinking());
        assert!(state.move_timer.ai_thinking_time.is_none());
        assert!(state.session.history().is_empty());
    }
}
