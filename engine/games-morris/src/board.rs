//! The 24-cell triple-ring board.
//!
//! Rings are numbered 0 (outer) to 2 (inner). Within a ring, cell 0 is the
//! upper-left corner and indices grow clockwise, so even cells are corners and
//! odd cells are the spokes that connect neighbouring rings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, PreconditionError};

pub const RINGS: u8 = 3;
pub const CELLS_PER_RING: u8 = 8;
pub const BOARD_SIZE: usize = (RINGS * CELLS_PER_RING) as usize;

/// One side of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Stable index used for per-player arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// Contents of a single board slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    White,
    Black,
}

impl Cell {
    pub fn owner(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::White => Some(Color::White),
            Cell::Black => Some(Color::Black),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => 'o',
            Cell::White => 'W',
            Cell::Black => 'B',
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Cell::White,
            Color::Black => Cell::Black,
        }
    }
}

/// A validated board coordinate. Stored as the compact index `ring * 8 + cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(u8);

impl Position {
    /// Build a position from ring/cell coordinates.
    pub fn new(ring: i32, cell: i32) -> Result<Self, PreconditionError> {
        if !(0..RINGS as i32).contains(&ring) || !(0..CELLS_PER_RING as i32).contains(&cell) {
            return Err(PreconditionError::PositionOutOfRange { ring, cell });
        }
        Ok(Self((ring * CELLS_PER_RING as i32 + cell) as u8))
    }

    /// Build a position from its compact index.
    pub fn from_index(index: i32) -> Result<Self, PreconditionError> {
        if !(0..BOARD_SIZE as i32).contains(&index) {
            return Err(PreconditionError::IndexOutOfRange(index));
        }
        Ok(Self(index as u8))
    }

    /// Internal constructor for coordinates that are in range by construction.
    #[inline]
    pub(crate) const fn at(ring: u8, cell: u8) -> Self {
        Self(ring * CELLS_PER_RING + cell % CELLS_PER_RING)
    }

    #[inline]
    pub fn ring(self) -> u8 {
        self.0 / CELLS_PER_RING
    }

    #[inline]
    pub fn cell(self) -> u8 {
        self.0 % CELLS_PER_RING
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Odd cells are spokes shared with the neighbouring rings.
    #[inline]
    pub fn is_intersection(self) -> bool {
        is_intersection(self.cell())
    }

    /// All 24 positions in index order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE as u8).map(Position)
    }

    /// Structural neighbours: both ring neighbours plus, on spokes, the
    /// same cell on the adjacent rings.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        let (ring, cell) = (self.ring(), self.cell());
        let (inward, outward) = if self.is_intersection() {
            (
                (ring + 1 < RINGS).then(|| Position::at(ring + 1, cell)),
                ring.checked_sub(1).map(|r| Position::at(r, cell)),
            )
        } else {
            (None, None)
        };
        [
            Some(Position::at(ring, cell + 1)),
            Some(Position::at(ring, cell + CELLS_PER_RING - 1)),
            inward,
            outward,
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ring(), self.cell())
    }
}

impl FromStr for Position {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ring, cell) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| DecodeError::InvalidPositionText(s.to_string()))?;
        let ring: i32 = ring
            .trim()
            .parse()
            .map_err(|_| DecodeError::InvalidPositionText(s.to_string()))?;
        let cell: i32 = cell
            .trim()
            .parse()
            .map_err(|_| DecodeError::InvalidPositionText(s.to_string()))?;
        Ok(Position::new(ring, cell)?)
    }
}

/// True iff `cell` is a spoke (odd index).
#[inline]
pub fn is_intersection(cell: u8) -> bool {
    cell % 2 == 1
}

/// Are `a` and `b` joined by a board line segment?
pub fn are_adjacent(a: Position, b: Position) -> bool {
    if a.ring() == b.ring() {
        let diff = a.cell().abs_diff(b.cell());
        return diff == 1 || diff == CELLS_PER_RING - 1;
    }
    a.cell() == b.cell() && a.is_intersection() && a.ring().abs_diff(b.ring()) == 1
}

/// Fixed 24-slot board. Small enough to copy per search branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Overwrite a slot.
    #[inline]
    pub fn put(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.index()] = cell;
    }

    #[inline]
    pub fn remove(&mut self, pos: Position) {
        self.put(pos, Cell::Empty);
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// Positions holding `cell`, in index order.
    pub fn positions_of(&self, cell: Cell) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |&pos| self.get(pos) == cell)
    }

    pub fn count(&self, color: Color) -> usize {
        self.positions_of(Cell::from(color)).count()
    }

    /// Is the piece at `pos` part of a mill?
    ///
    /// Corners check the two ring windows that contain them; spokes check the
    /// ring window centred on them plus the line across all three rings.
    pub fn is_mill(&self, pos: Position) -> bool {
        let owner = self.get(pos);
        if owner.is_empty() {
            return false;
        }

        let ring = pos.ring();
        let cell = pos.cell();
        let ring_line = |start: u8| (0..3).all(|k| self.get(Position::at(ring, start + k)) == owner);

        if pos.is_intersection() {
            ring_line(cell - 1) || (0..RINGS).all(|r| self.get(Position::at(r, cell)) == owner)
        } else {
            ring_line(cell) || ring_line(cell + CELLS_PER_RING - 2)
        }
    }

    pub fn any_adjacent_empty(&self, pos: Position) -> bool {
        pos.neighbors().any(|n| self.get(n).is_empty())
    }

    /// Grid coordinates (row, col) of a position on the 7x7 diagram.
    fn grid_coords(pos: Position) -> (usize, usize) {
        let r = pos.ring() as usize;
        let far = 6 - r;
        match pos.cell() {
            0 => (r, r),
            1 => (r, 3),
            2 => (r, far),
            3 => (3, far),
            4 => (far, far),
            5 => (far, 3),
            6 => (far, r),
            _ => (3, r),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid = [[' '; 7]; 7];
        for pos in Position::all() {
            let (row, col) = Self::grid_coords(pos);
            grid[row][col] = self.get(pos).symbol();
        }
        for (i, row) in grid.iter().enumerate() {
            let line: String = row
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            if i < 6 {
                writeln!(f, "{}", line.trim_end())?;
            } else {
                write!(f, "{}", line.trim_end())?;
            }
        }
        Ok(())
    }
}
