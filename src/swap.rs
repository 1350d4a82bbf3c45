//! Swap validation: adjacency and hypothetical match checks.
//!
//! Nothing here mutates the grid. The hypothetical swap is evaluated through a
//! read-only view that exchanges the two cells on the fly.

use crate::error::GridError;
use crate::grid::{Cell, Grid, Pos};
use crate::matcher::has_run_through_with;

/// Outcome of checking a requested swap. Only `Valid` may be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapVerdict {
    Valid,
    NotAdjacent,
    /// One of the two cells holds no token.
    EmptyCell,
    /// Adjacent tokens, but exchanging them creates no run.
    NoMatch,
}

impl SwapVerdict {
    #[inline]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

/// True iff `a` and `b` are orthogonal neighbours (Manhattan distance 1).
#[inline]
pub fn is_adjacent(a: Pos, b: Pos) -> bool {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y) == 1
}

/// Would exchanging `a` and `b` produce a run through either cell?
/// Only the rows and columns through the two cells are inspected.
pub fn would_create_match(grid: &Grid, a: Pos, b: Pos) -> Result<bool, GridError> {
    grid.get(a)?;
    grid.get(b)?;
    let swapped = |x: usize, y: usize| -> Option<Cell> {
        let p = Pos::new(x, y);
        if p == a {
            grid.cell(b.x, b.y)
        } else if p == b {
            grid.cell(a.x, a.y)
        } else {
            grid.cell(x, y)
        }
    };
    Ok(has_run_through_with(a, swapped) || has_run_through_with(b, swapped))
}

/// Full check for a player swap. Out-of-bounds input is an error; every other
/// rejection is a verdict.
pub fn check_swap(grid: &Grid, a: Pos, b: Pos) -> Result<SwapVerdict, GridError> {
    let (ca, cb) = (grid.get(a)?, grid.get(b)?);
    if !is_adjacent(a, b) {
        return Ok(SwapVerdict::NotAdjacent);
    }
    if ca.is_empty() || cb.is_empty() {
        return Ok(SwapVerdict::EmptyCell);
    }
    if would_create_match(grid, a, b)? {
        Ok(SwapVerdict::Valid)
    } else {
        Ok(SwapVerdict::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency() {
        let (x, y) = (3, 4);
        assert!(is_adjacent(Pos::new(x, y), Pos::new(x, y + 1)));
        assert!(is_adjacent(Pos::new(x, y), Pos::new(x + 1, y)));
        assert!(is_adjacent(Pos::new(x, y), Pos::new(x - 1, y)));
        assert!(!is_adjacent(Pos::new(x, y), Pos::new(x + 1, y + 1)));
        assert!(!is_adjacent(Pos::new(x, y), Pos::new(x, y)));
        assert!(!is_adjacent(Pos::new(x, y), Pos::new(x + 2, y)));
    }

    #[test]
    fn test_would_create_match_horizontal() {
        let g = Grid::from_rows(&["AABA", "BCCD"]).unwrap();
        // Top row is y = 1: swapping (2,1)=B with (3,1)=A gives AAAB.
        assert!(would_create_match(&g, Pos::new(2, 1), Pos::new(3, 1)).unwrap());
        assert!(!would_create_match(&g, Pos::new(0, 0), Pos::new(1, 0)).unwrap());
        assert_eq!(g, Grid::from_rows(&["AABA", "BCCD"]).unwrap());
    }

    #[test]
    fn test_would_create_match_vertical_through_second_cell() {
        let g = Grid::from_rows(&["AB", "AC", "BA"]).unwrap();
        // Swapping bottom row brings A under the two As in column 0.
        assert!(would_create_match(&g, Pos::new(1, 0), Pos::new(0, 0)).unwrap());
    }

    #[test]
    fn test_check_swap_verdicts() {
        let g = Grid::from_rows(&["AB.A", "BAAC"]).unwrap();
        assert_eq!(
            check_swap(&g, Pos::new(0, 0), Pos::new(0, 1)).unwrap(),
            SwapVerdict::Valid
        );
        assert_eq!(
            check_swap(&g, Pos::new(0, 0), Pos::new(2, 0)).unwrap(),
            SwapVerdict::NotAdjacent
        );
        assert_eq!(
            check_swap(&g, Pos::new(2, 1), Pos::new(2, 0)).unwrap(),
            SwapVerdict::EmptyCell
        );
        assert_eq!(
            check_swap(&g, Pos::new(2, 0), Pos::new(3, 0)).unwrap(),
            SwapVerdict::NoMatch
        );
        assert!(check_swap(&g, Pos::new(3, 0), Pos::new(4, 0)).is_err());
    }
}
