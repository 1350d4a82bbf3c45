//! Grid store: cells, tokens, positions and bounds-checked access.

use crate::error::GridError;
use std::fmt;

/// Token kind index (`0..kinds`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(pub u8);

impl Token {
    /// Display letter: kind 0 is `A`, kind 1 is `B`, ...
    pub fn letter(self) -> char {
        char::from(b'A' + self.0 % 26)
    }
}

/// Single cell: either empty or holding one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Token(Token),
}

impl Cell {
    #[inline]
    pub fn token(self) -> Option<Token> {
        match self {
            Self::Token(t) => Some(t),
            Self::Empty => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// Grid coordinate. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Playfield: `width` columns of `height` cells each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// columns[x][y] = cell. columns[x][0] is the bottom.
    columns: Vec<Vec<Cell>>,
}

impl Grid {
    /// All-empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            columns: (0..width).map(|_| vec![Cell::Empty; height]).collect(),
        }
    }

    /// Build from text rows, top row first. `A`..`Z` are kinds 0..25, `.` is empty,
    /// whitespace is ignored. Returns `None` for ragged rows or unknown characters.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let parsed: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| match c {
                        '.' => Some(Cell::Empty),
                        'A'..='Z' => Some(Cell::Token(Token(c as u8 - b'A'))),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<_>>()?;
        let height = parsed.len();
        let width = parsed.first().map_or(0, Vec::len);
        if parsed.iter().any(|r| r.len() != width) {
            return None;
        }
        let mut grid = Self::new(width, height);
        for (row_idx, row) in parsed.into_iter().enumerate() {
            let y = height - 1 - row_idx;
            for (x, cell) in row.into_iter().enumerate() {
                grid.columns[x][y] = cell;
            }
        }
        Some(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn check(&self, pos: Pos) -> Result<(), GridError> {
        if self.in_bounds(pos.x, pos.y) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, pos: Pos) -> Result<Cell, GridError> {
        self.check(pos)?;
        Ok(self.columns[pos.x][pos.y])
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<(), GridError> {
        self.check(pos)?;
        self.columns[pos.x][pos.y] = cell;
        Ok(())
    }

    /// Exchange the contents of two cells.
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), GridError> {
        let (ca, cb) = (self.get(a)?, self.get(b)?);
        self.columns[a.x][a.y] = cb;
        self.columns[b.x][b.y] = ca;
        Ok(())
    }

    /// Read for internal scans; `None` when out of bounds.
    #[inline]
    pub(crate) fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.columns.get(x).and_then(|c| c.get(y)).copied()
    }

    /// Write for internal passes over known-good coordinates; ignores out-of-bounds.
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(c) = self.columns.get_mut(x).and_then(|col| col.get_mut(y)) {
            *c = cell;
        }
    }

    /// Column `x`, bottom cell first.
    pub fn column(&self, x: usize) -> Option<&[Cell]> {
        self.columns.get(x).map(Vec::as_slice)
    }

    pub(crate) fn column_mut(&mut self, x: usize) -> Option<&mut [Cell]> {
        self.columns.get_mut(x).map(Vec::as_mut_slice)
    }

    /// Every position, row by row from the bottom, left to right.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos::new(x, y)))
    }

    pub fn count_empty(&self) -> usize {
        self.columns
            .iter()
            .flatten()
            .filter(|c| c.is_empty())
            .count()
    }
}

impl fmt::Display for Grid {
    /// One line per row, top row first; `.` for empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let c = match self.columns[x][y] {
                    Cell::Empty => '.',
                    Cell::Token(t) => t.letter(),
                };
                write!(f, "{c}")?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_reported() {
        let mut g = Grid::new(3, 4);
        assert!(g.in_bounds(2, 3));
        assert!(!g.in_bounds(3, 0));
        assert_eq!(
            g.get(Pos::new(0, 4)),
            Err(GridError::OutOfBounds { x: 0, y: 4, width: 3, height: 4 })
        );
        assert!(g.set(Pos::new(5, 0), Cell::Token(Token(0))).is_err());
        assert_eq!(g.count_empty(), 12);
    }

    #[test]
    fn test_from_rows_is_top_first() {
        let g = Grid::from_rows(&["AB.", "CCA"]).unwrap();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.get(Pos::new(0, 0)).unwrap(), Cell::Token(Token(2)));
        assert_eq!(g.get(Pos::new(1, 1)).unwrap(), Cell::Token(Token(1)));
        assert_eq!(g.get(Pos::new(2, 1)).unwrap(), Cell::Empty);
        assert_eq!(g.to_string(), "AB.\nCCA");
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Grid::from_rows(&["AB", "A"]).is_none());
        assert!(Grid::from_rows(&["a"]).is_none());
    }

    #[test]
    fn test_swap_exchanges_cells() {
        let mut g = Grid::from_rows(&["AB"]).unwrap();
        g.swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(g.to_string(), "BA");
        assert!(g.swap(Pos::new(0, 0), Pos::new(2, 0)).is_err());
        assert_eq!(g.to_string(), "BA");
    }
}
