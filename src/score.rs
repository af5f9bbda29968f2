//! Leaf evaluation
//!
//! Every scorer answers from the point of view of the player to move. A board
//! that already holds four-in-a-row is lost for that player, because the
//! alignment can only have been made by the previous mover.

use crate::board::Board;

/// Value of a position where four-in-a-row is already on the board
pub const LOSS_SCORE: i32 = -100;

/// Evaluates a position for the player to move
pub trait Scorer {
    fn score(&self, board: &Board) -> i32;
}

/// Only distinguishes lost positions (`LOSS_SCORE`) from everything else (0)
#[derive(Copy, Clone, Debug, Default)]
pub struct MatrixScorer;

impl Scorer for MatrixScorer {
    fn score(&self, board: &Board) -> i32 {
        if board.find_four_scan() {
            LOSS_SCORE
        } else {
            0
        }
    }
}

/// Counts immediately playable winning squares of both sides
///
/// Non-terminal values stay well inside `(-LOSS_SCORE, LOSS_SCORE)` as a board
/// has at most `WIDTH` playable squares.
#[derive(Copy, Clone, Debug, Default)]
pub struct MobilityScorer;

impl Scorer for MobilityScorer {
    fn score(&self, board: &Board) -> i32 {
        if board.find_four() {
            return LOSS_SCORE;
        }
        let player = board.current_player();
        board.winning_squares(player).count_ones() as i32
            - board.winning_squares(player.other()).count_ones() as i32
    }
}
