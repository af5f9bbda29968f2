//! The position model shared by every search
//!
//! A [`Board`] keeps a single source of truth, the packed [`BitBoard`], and
//! derives the [`Grid`] view from it on request, so both views always agree.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    bitboard::BitBoard,
    error::{Error, Result},
    grid::Grid,
    HEIGHT, WIDTH,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// +1 for the first player, -1 for the second
    pub fn sign(&self) -> i8 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// A Connect 4 position with its move history
///
/// Equality and hashing only look at the tiles and the side to move, so two
/// boards reached through different move orders compare equal.
#[derive(Copy, Clone, Debug)]
pub struct Board {
    bitboard: BitBoard,
    // columns played so far, in order
    history: [u8; WIDTH * HEIGHT],
}

impl Board {
    pub fn new() -> Self {
        Self {
            bitboard: BitBoard::new(),
            history: [0; WIDTH * HEIGHT],
        }
    }

    /// Builds a board from a string of 1-indexed column digits, e.g. `"4453"`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => board.play(column - 1)?,
                _ => return Err(Error::InvalidMove(column_char.to_string())),
            }
        }
        Ok(board)
    }

    /// Drops a tile for the current player into a 0-indexed column
    pub fn play(&mut self, column: usize) -> Result<()> {
        if column >= WIDTH {
            return Err(Error::InvalidMove((column + 1).to_string()));
        }
        if !self.bitboard.playable(column) {
            return Err(Error::ColumnFull(column + 1));
        }
        self.play_unchecked(column);
        Ok(())
    }

    pub(crate) fn play_unchecked(&mut self, column: usize) {
        self.history[self.bitboard.num_moves()] = column as u8;
        self.bitboard.play(column);
    }

    /// Takes back the last move, returning its column
    pub fn undo(&mut self) -> Option<usize> {
        let num_moves = self.bitboard.num_moves();
        if num_moves == 0 {
            return None;
        }
        let column = self.history[num_moves - 1] as usize;
        self.bitboard.undo(column);
        Some(column)
    }

    /// Columns played so far, 0-indexed
    pub fn moves(&self) -> &[u8] {
        &self.history[..self.bitboard.num_moves()]
    }

    pub fn current_player(&self) -> Player {
        if self.bitboard.num_moves() % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    pub fn num_moves(&self) -> usize {
        self.bitboard.num_moves()
    }

    pub fn playable(&self, column: usize) -> bool {
        column < WIDTH && self.bitboard.playable(column)
    }

    pub fn is_full(&self) -> bool {
        self.bitboard.num_moves() == WIDTH * HEIGHT
    }

    /// Bitwise check for four aligned tiles of either player
    pub fn find_four(&self) -> bool {
        BitBoard::has_alignment(self.bitboard.player_mask())
            || BitBoard::has_alignment(self.bitboard.opponent_mask())
    }

    /// Cell-scan check for four aligned tiles of either player
    pub fn find_four_scan(&self) -> bool {
        self.grid().find_four()
    }

    /// True for a full board or any four-in-a-row
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.find_four()
    }

    /// True if the player to move can complete four on this move
    pub fn can_win_next(&self) -> bool {
        self.winning_squares(self.current_player()) != 0
    }

    /// Playable squares that would complete four for `player`
    pub fn winning_squares(&self, player: Player) -> u64 {
        let tiles = if player == self.current_player() {
            self.bitboard.player_mask()
        } else {
            self.bitboard.opponent_mask()
        };
        self.bitboard.playable_winning_positions(tiles)
    }

    /// Non-full columns in increasing order
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> {
        let bitboard = self.bitboard;
        (0..WIDTH).filter(move |&column| bitboard.playable(column))
    }

    /// Successor positions, one per non-full column, left to right
    pub fn children(&self) -> Children {
        Children {
            parent: *self,
            column: 0,
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::from_bitboard(&self.bitboard)
    }

    pub fn bitboard(&self) -> &BitBoard {
        &self.bitboard
    }

    /// Canonical identity of the position
    pub fn key(&self) -> u64 {
        self.bitboard.key()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid())
    }
}

/// Lazy successor generator returned by [`Board::children`]
pub struct Children {
    parent: Board,
    column: usize,
}

impl Iterator for Children {
    type Item = Board;

    fn next(&mut self) -> Option<Self::Item> {
        while self.column < WIDTH {
            let column = self.column;
            self.column += 1;
            if self.parent.bitboard.playable(column) {
                let mut child = self.parent;
                child.play_unchecked(column);
                return Some(child);
            }
        }
        None
    }
}
