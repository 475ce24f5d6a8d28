//! Board representation and win detection

use std::fmt;

use serde::{Deserialize, Serialize};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Board side length
pub const SIZE: usize = 3;

/// Number of cells on the board
pub const CELLS: usize = SIZE * SIZE;

/// A player's mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn opponent(self) -> Marker {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            Marker::X => Cell::X,
            Marker::O => Cell::O,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn marker(self) -> Option<Marker> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Marker::X),
            Cell::O => Some(Marker::O),
        }
    }
}

/// The nine cells, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse nine cell characters, ignoring whitespace and `/` separators.
    ///
    /// ```
    /// use turn_learner::games::noughts::{Board, Cell};
    ///
    /// let board = Board::from_rows("X.O/.X./..O").unwrap();
    /// assert_eq!(board.get(0, 2), Cell::O);
    /// ```
    pub fn from_rows(rows: &str) -> Option<Self> {
        let mut cells = [Cell::Empty; CELLS];
        let mut count = 0;
        for c in rows.chars().filter(|c| *c != '/' && !c.is_whitespace()) {
            if count == CELLS {
                return None;
            }
            cells[count] = Cell::from_char(c)?;
            count += 1;
        }
        (count == CELLS).then_some(Self { cells })
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * SIZE + col]
    }

    /// Copy of the board with `cell` placed at `(row, col)`
    pub fn with(&self, row: usize, col: usize, cell: Cell) -> Self {
        let mut cells = self.cells;
        cells[row * SIZE + col] = cell;
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    /// Empty cells as `(row, col)`, row-major
    pub fn empty_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(index, _)| (index / SIZE, index % SIZE))
    }

    /// Check if `marker` has three in a row
    pub fn has_won(&self, marker: Marker) -> bool {
        let target = marker.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| self.cells[idx] == target))
    }

    /// The marker with three in a row, X checked first
    pub fn winner(&self) -> Option<Marker> {
        [Marker::X, Marker::O]
            .into_iter()
            .find(|&marker| self.has_won(marker))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}  ", row_label(row))?;
            for col in 0..SIZE {
                write!(f, "{}", self.get(row, col).to_char())?;
            }
        }
        Ok(())
    }
}

/// Row letter used in move names: 0 is `A`
pub fn row_label(row: usize) -> char {
    char::from(b'A' + row as u8)
}
