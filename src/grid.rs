use std::fmt;

use crate::{bitboard::BitBoard, HEIGHT, WIDTH};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric cell value: +1 for player 1, -1 for player 2, 0 when empty
    pub fn value(&self) -> i8 {
        match self {
            Cell::PlayerOne => 1,
            Cell::PlayerTwo => -1,
            Cell::Empty => 0,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Cell::PlayerOne => "O",
            Cell::PlayerTwo => "X",
            Cell::Empty => " ",
        }
    }
}

/// Cell-by-cell view of a position
///
/// Row 0 is the top of the board, row `HEIGHT - 1` the bottom.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Grid {
    cells: [[Cell; WIDTH]; HEIGHT],
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    pub fn from_bitboard(board: &BitBoard) -> Self {
        // player 1 is to move after an even number of moves
        let (player_one, player_two) = if board.num_moves() % 2 == 0 {
            (board.player_mask(), board.opponent_mask())
        } else {
            (board.opponent_mask(), board.player_mask())
        };

        let mut grid = Self::new();
        for column in 0..WIDTH {
            for height in 0..HEIGHT {
                let tile = BitBoard::cell_mask(column, height);
                grid.cells[HEIGHT - 1 - height][column] = if player_one & tile != 0 {
                    Cell::PlayerOne
                } else if player_two & tile != 0 {
                    Cell::PlayerTwo
                } else {
                    Cell::Empty
                };
            }
        }
        grid
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; WIDTH]> {
        self.cells.iter()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.is_empty()).count()
    }

    /// Scans every occupied cell for three more equal cells to the right,
    /// downwards, and along both downward diagonals
    pub fn find_four(&self) -> bool {
        const STEPS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                let cell = self.cells[row][column];
                if cell.is_empty() {
                    continue;
                }
                for &(d_row, d_column) in STEPS.iter() {
                    let aligned = (1..4).all(|i| {
                        let r = row as isize + d_row * i;
                        let c = column as isize + d_column * i;
                        r < HEIGHT as isize
                            && c >= 0
                            && c < WIDTH as isize
                            && self.cells[r as usize][c as usize] == cell
                    });
                    if aligned {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(Cell::symbol)
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect();
        write!(f, "{}", rows.join("\n"))
    }
}
