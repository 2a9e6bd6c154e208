//! Session configuration: variant presets and the command-line interface

use clap::{Parser, ValueEnum};
use derive_more::{Display, Error};

use crate::player::Players;
use crate::rules::{Goal, MoveModel, RuleSet, Scoring, TurnOrder};
use crate::tiles::TileSet;

/// Largest board side the position type can address
pub const MAX_SIDE: u8 = 16;

/// Invalid configuration
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ConfigError {
    #[display("board size {rows}x{cols} is not supported (1 to 16 cells per side)")]
    InvalidSize { rows: u8, cols: u8 },
    #[display("a line of {length} cannot be completed on a {rows}x{cols} board")]
    InvalidLineLength { length: u8, rows: u8, cols: u8 },
    #[display("prepared board is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    PositionSize {
        rows: u8,
        cols: u8,
        expected_rows: u8,
        expected_cols: u8,
    },
    #[display("unsupported rule combination: {reason}")]
    UnsupportedCombination { reason: &'static str },
    #[display("obstacle fraction {fraction} must lie in [0, 1]")]
    ObstacleFraction { fraction: f64 },
    #[display("could not satisfy tile placement constraints after {attempts} attempts")]
    UnsatisfiablePlacement { attempts: u32 },
}

/// Built-in game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// Walk the grid one step at a time eating fruit; highest score wins
    Fruit,
    /// Pick any fruit tile on your turn; highest score wins
    Harvest,
    /// Harvest with only the computer moving
    Solo,
    /// Tic-tac-toe: first to complete a line wins
    Line,
}

/// Which front end drives the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Frontend {
    #[default]
    Console,
    Gui,
}

/// Grid Duel - two-player grid games against a full-depth minimax opponent
#[derive(Parser, Debug)]
#[command(name = "grid_duel")]
#[command(about = "Play fruit duel or tic-tac-toe against an alpha-beta search", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Game variant
    #[arg(short, long, value_enum, default_value_t = Variant::Fruit)]
    pub variant: Variant,

    /// Board rows (variant default if omitted)
    #[arg(long)]
    pub rows: Option<u8>,

    /// Board columns (variant default if omitted)
    #[arg(long)]
    pub cols: Option<u8>,

    /// Marks in a row needed to win (line variant)
    #[arg(long)]
    pub line_length: Option<u8>,

    /// Maximum share of obstacle tiles on a generated board
    #[arg(long, default_value_t = 0.2)]
    pub obstacle_fraction: f64,

    /// Seed for reproducible boards
    #[arg(long)]
    pub seed: Option<u64>,

    /// Let the computer make the first move
    #[arg(long)]
    pub computer_first: bool,

    /// Start a fresh board after each game
    #[arg(long)]
    pub restart: bool,

    /// Console or windowed front end
    #[arg(long, value_enum, default_value_t = Frontend::Console)]
    pub frontend: Frontend,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Immutable per-session configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub variant: Variant,
    pub rows: u8,
    pub cols: u8,
    pub line_length: u8,
    pub obstacle_fraction: f64,
    pub seed: Option<u64>,
    pub computer_first: bool,
    pub restart: bool,
}

impl GameConfig {
    /// Defaults for a variant. Board sizes keep full-depth search interactive.
    pub fn for_variant(variant: Variant) -> Self {
        let (rows, cols) = match variant {
            Variant::Fruit => (4, 4),
            Variant::Harvest => (2, 4),
            Variant::Solo => (2, 4),
            Variant::Line => (3, 3),
        };
        Self {
            variant,
            rows,
            cols,
            line_length: 3,
            obstacle_fraction: 0.2,
            seed: None,
            computer_first: variant == Variant::Solo,
            restart: false,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::for_variant(cli.variant);
        config.rows = cli.rows.unwrap_or(config.rows);
        config.cols = cli.cols.unwrap_or(config.cols);
        config.line_length = cli.line_length.unwrap_or(config.line_length);
        config.obstacle_fraction = cli.obstacle_fraction;
        config.seed = cli.seed;
        config.computer_first |= cli.computer_first;
        config.restart = cli.restart;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 || self.rows > MAX_SIDE || self.cols > MAX_SIDE {
            return Err(ConfigError::InvalidSize {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(0.0..=1.0).contains(&self.obstacle_fraction) {
            return Err(ConfigError::ObstacleFraction {
                fraction: self.obstacle_fraction,
            });
        }
        if self.variant == Variant::Line
            && (self.line_length == 0 || self.line_length > self.rows.max(self.cols))
        {
            return Err(ConfigError::InvalidLineLength {
                length: self.line_length,
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.variant == Variant::Fruit && (self.rows < 3 || self.cols < 2) {
            // Starting cells (0, C-1) and (R-2, 1) must be distinct
            return Err(ConfigError::InvalidSize {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.rule_set().map(|_| ())
    }

    /// Rules for the configured variant
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        let (model, goal, scoring, turns) = match self.variant {
            Variant::Fruit => (
                MoveModel::DirectionalStep,
                Goal::Collect,
                Scoring::Accumulate,
                TurnOrder::Alternating,
            ),
            Variant::Harvest => (
                MoveModel::FreePlacement,
                Goal::Collect,
                Scoring::Accumulate,
                TurnOrder::Alternating,
            ),
            Variant::Solo => (
                MoveModel::FreePlacement,
                Goal::Collect,
                Scoring::Accumulate,
                TurnOrder::Solo,
            ),
            Variant::Line => (
                MoveModel::FreePlacement,
                Goal::Line {
                    length: self.line_length,
                },
                Scoring::Outcome,
                TurnOrder::Alternating,
            ),
        };
        RuleSet::new(self.rows, self.cols, model, goal, scoring, turns)
    }

    pub fn tiles(&self) -> TileSet {
        match self.variant {
            Variant::Line => TileSet::blank(),
            _ => TileSet::fruit(),
        }
    }

    pub fn players(&self) -> Players {
        match self.variant {
            Variant::Line => Players::noughts_and_crosses(),
            _ => Players::fruit_duel(),
        }
    }
}
