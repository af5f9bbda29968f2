//! Position analysis for the board game 'Connect 4'
//!
//! A position is held in one [`Board`](board::Board) that exposes both a packed
//! bitboard view and a cell grid view. A [`Solver`](solver::Solver) searches it
//! with plain negamax, alpha-beta negamax or memoized alpha-beta negamax and
//! returns a value from the point of view of the side to move.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{board::Board, score::MatrixScorer, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // player 1 threatens both ends of an open three
//! let mut solver = Solver::new(Board::from_moves("4455")?, MatrixScorer);
//! let score = solver.negabeta(-1000, 1000, 3)?;
//!
//! assert_eq!(score, 100);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod bitboard;

pub mod grid;

pub mod board;

pub mod score;

pub mod transposition_table;

pub mod solver;

pub mod config;

pub mod test_suite;


pub use error::{Error, Result};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
