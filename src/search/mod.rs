//! Search module for the computer player
//!
//! Contains:
//! - Full-depth minimax with alpha-beta pruning over an in-place board

pub mod alphabeta;

pub use alphabeta::{Role, SearchResult, SearchStats, Searcher, INF, LOSS, WIN};
