//! Initial-state generation
//!
//! Fruit boards are filled with tiles drawn with replacement from the whole
//! alphabet (obstacle included), then players are dropped onto their
//! starting cells. A draw is rejected when an obstacle sits next to a
//! starting cell or when obstacles exceed the configured share of the board.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::board::{Board, Cell, PlayerId, Pos};
use crate::config::{ConfigError, GameConfig, Variant};
use crate::player::Players;
use crate::tiles::TileSet;

/// Give up after this many rejected boards
pub const MAX_ATTEMPTS: u32 = 1_000;

/// Seeded random board generator
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    rng: StdRng,
}

impl BoardGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Starting cells: human top-right, computer one row up from the bottom
    /// in the second column
    pub fn start_positions(rows: u8, cols: u8) -> [Pos; 2] {
        [
            Pos::new(0, cols - 1),
            Pos::new(rows.saturating_sub(2), 1.min(cols - 1)),
        ]
    }

    /// Fresh board for a round, with player positions and scores reset
    pub fn generate(
        &mut self,
        config: &GameConfig,
        tiles: &TileSet,
        players: &mut Players,
    ) -> Result<Board, ConfigError> {
        players.reset();
        match config.variant {
            Variant::Line => Ok(Board::new(config.rows, config.cols)),
            Variant::Harvest | Variant::Solo => {
                self.fruit_board(config, tiles, &[])
            }
            Variant::Fruit => {
                let starts = Self::start_positions(config.rows, config.cols);
                let mut board = self.fruit_board(config, tiles, &starts)?;
                for (id, pos) in PlayerId::ALL.into_iter().zip(starts) {
                    board[pos] = Cell::Occupied(id);
                    players[id].pos = Some(pos);
                }
                Ok(board)
            }
        }
    }

    fn fruit_board(
        &mut self,
        config: &GameConfig,
        tiles: &TileSet,
        starts: &[Pos],
    ) -> Result<Board, ConfigError> {
        let (rows, cols) = (config.rows, config.cols);
        let cells = rows as usize * cols as usize;
        let max_obstacles = (config.obstacle_fraction * cells as f64).floor() as usize;
        let kinds = tiles.draw_kinds();

        let mut board = Board::new(rows, cols);
        let open: Vec<Pos> = board.positions().filter(|p| !starts.contains(p)).collect();
        let guarded: Vec<Pos> = starts
            .iter()
            .flat_map(|&s| open.iter().copied().filter(move |&p| p.distance(s) == 1))
            .collect();

        if kinds == 0 {
            return Ok(board);
        }

        let mut draw: Vec<Cell> = Vec::with_capacity(open.len());
        for attempt in 1..=MAX_ATTEMPTS {
            draw.clear();
            draw.extend((0..open.len()).map(|_| tiles.drawn_cell(self.rng.gen_range(0..kinds))));
            draw.shuffle(&mut self.rng);

            let obstacles = draw.iter().filter(|&&c| c == Cell::Obstacle).count();
            if obstacles > max_obstacles {
                continue;
            }
            for (&pos, &cell) in open.iter().zip(&draw) {
                board[pos] = cell;
            }
            if guarded.iter().any(|&p| board[p] == Cell::Obstacle) {
                continue;
            }

            debug!(attempt, obstacles, "generated board");
            return Ok(board);
        }

        Err(ConfigError::UnsatisfiablePlacement {
            attempts: MAX_ATTEMPTS,
        })
    }
}
