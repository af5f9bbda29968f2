//! Packed-bit board representation
//!
//! Cells are laid out column-major, bottom to top, with one guard bit on top
//! of every column so that shifted patterns never bleed into the next column:
//!
//! ```text
//!  6 13 20 27 34 41 48   <- guard row, always 0
//!  5 12 19 26 33 40 47
//!  4 11 18 25 32 39 46
//!  3 10 17 24 31 38 45
//!  2  9 16 23 30 37 44
//!  1  8 15 22 29 36 43
//!  0  7 14 21 28 35 42
//! ```

use crate::HEIGHT;

pub(crate) mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT as u64) - 1)
    }
}

/// Shift strides of the four alignment directions
const DIRECTIONS: [usize; 4] = [
    // vertical
    1,
    // horizontal
    HEIGHT + 1,
    // diagonal /
    HEIGHT,
    // diagonal \
    HEIGHT + 2,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitBoard {
    // mask of the current player's tiles
    player_mask: u64,
    // mask of all tiles
    board_mask: u64,
    num_moves: usize,
}
impl BitBoard {
    pub fn new() -> Self {
        Self {
            player_mask: 0,
            board_mask: 0,
            num_moves: 0,
        }
    }

    /// Tiles of the player to move
    pub fn player_mask(&self) -> u64 {
        self.player_mask
    }

    /// Tiles of the player who moved last
    pub fn opponent_mask(&self) -> u64 {
        self.player_mask ^ self.board_mask
    }

    pub fn board_mask(&self) -> u64 {
        self.board_mask
    }

    pub fn top_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
    }

    pub fn cell_mask(column: usize, row: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + row)
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn playable(&self, column: usize) -> bool {
        Self::top_mask(column) & self.board_mask == 0
    }

    /// Squares where a tile could be dropped right now
    pub fn possible_moves(&self) -> u64 {
        (self.board_mask + static_masks::bottom_mask()) & static_masks::full_board_mask()
    }

    /// Drops a tile for the current player, the column must be playable
    pub fn play(&mut self, column: usize) {
        debug_assert!(self.playable(column));
        let move_bitmap =
            (self.board_mask + Self::bottom_mask(column)) & Self::column_mask(column);
        // switch the current player
        self.player_mask ^= self.board_mask;
        // add a cell of the previous player to the correct column
        self.board_mask |= move_bitmap;
        self.num_moves += 1;
        self.debug_check();
    }

    /// Takes back the top tile of `column`, which must be the last tile played
    pub fn undo(&mut self, column: usize) {
        debug_assert!(self.num_moves > 0);
        let column_tiles = self.board_mask & Self::column_mask(column);
        debug_assert!(column_tiles != 0);
        // the highest tile sits just below the first empty cell
        let move_bitmap = (column_tiles + Self::bottom_mask(column)) >> 1;
        self.board_mask ^= move_bitmap;
        // switch back to the player who made the move
        self.player_mask ^= self.board_mask;
        self.num_moves -= 1;
        self.debug_check();
    }

    // player tiles are a subset of all tiles, and guard bits stay clear
    fn debug_check(&self) {
        debug_assert_eq!(self.player_mask & !self.board_mask, 0);
        debug_assert_eq!(self.board_mask & !static_masks::full_board_mask(), 0);
        debug_assert_eq!(self.board_mask.count_ones() as usize, self.num_moves);
    }

    /// True if `tiles` contain four aligned cells in any direction
    pub fn has_alignment(tiles: u64) -> bool {
        DIRECTIONS.iter().any(|&shift| {
            // mark all runs of 2
            let m = tiles & (tiles >> shift);
            // check for runs of 2 * (runs of 2)
            m & (m >> (2 * shift)) != 0
        })
    }

    /// Bitmap of empty squares that would complete an alignment for `tiles`
    pub fn winning_positions(&self, tiles: u64) -> u64 {
        // vertical
        // find the top ends of 3-alignemnts
        let mut r = (tiles << 1) & (tiles << 2) & (tiles << 3);

        for &shift in DIRECTIONS[1..].iter() {
            let mut p = (tiles << shift) & (tiles << (2 * shift));
            // find the right ends of 3-alignments
            r |= p & (tiles << (3 * shift));
            // find holes of the type ...O O _ O...
            r |= p & (tiles >> shift);

            p = (tiles >> shift) & (tiles >> (2 * shift));
            // find the left ends of 3-alignments
            r |= p & (tiles >> (3 * shift));
            // find holes of the type ...O _ O O...
            r |= p & (tiles << shift);
        }

        r & (static_masks::full_board_mask() ^ self.board_mask)
    }

    /// Winning squares for `tiles` that can be played on the next move
    pub fn playable_winning_positions(&self, tiles: u64) -> u64 {
        self.winning_positions(tiles) & self.possible_moves()
    }

    // key for transposition table
    pub fn key(&self) -> u64 {
        self.player_mask + self.board_mask
    }
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::new()
    }
}
