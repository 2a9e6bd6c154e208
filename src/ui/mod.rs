//! GUI front end for Grid Duel
//!
//! This module provides a native Rust GUI using egui/eframe.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::GridDuelApp;
pub use game_state::{AiState, GameState, MoveTimer};
