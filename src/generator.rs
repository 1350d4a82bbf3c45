//! Initial board generation with no pre-existing run of three.

use crate::grid::{Cell, Grid, Pos, Token};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

/// Cells where every kind would have completed a run, so a random kind was forced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub fallbacks: Vec<Pos>,
}

impl GenerationReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// New `width x height` grid filled by [`fill_without_matches`].
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    kinds: u8,
    rng: &mut R,
) -> (Grid, GenerationReport) {
    let mut grid = Grid::new(width, height);
    let report = fill_without_matches(&mut grid, kinds, rng);
    (grid, report)
}

/// Overwrite every cell, column by column from the bottom-left.
///
/// Only cells already placed (left and below) can complete a run, so a kind is
/// excluded when the two cells to the left, or the two cells below, both hold it.
/// If that leaves no candidate (fewer than three kinds), any kind is chosen and
/// the cell is recorded as a fallback.
pub fn fill_without_matches<R: Rng + ?Sized>(
    grid: &mut Grid,
    kinds: u8,
    rng: &mut R,
) -> GenerationReport {
    let kinds = kinds.max(1);
    let mut report = GenerationReport::default();
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let mut candidates: Vec<u8> = (0..kinds).collect();
            if x >= 2 {
                if let Some(t) = same_pair(grid.cell(x - 1, y), grid.cell(x - 2, y)) {
                    candidates.retain(|&k| k != t.0);
                }
            }
            if y >= 2 {
                if let Some(t) = same_pair(grid.cell(x, y - 1), grid.cell(x, y - 2)) {
                    candidates.retain(|&k| k != t.0);
                }
            }
            let kind = match candidates.choose(rng) {
                Some(&k) => k,
                None => {
                    warn!(x, y, kinds, "no kind avoids a run; placing a random token");
                    report.fallbacks.push(Pos::new(x, y));
                    rng.gen_range(0..kinds)
                }
            };
            grid.put(x, y, Cell::Token(Token(kind)));
        }
    }
    debug!(
        width = grid.width(),
        height = grid.height(),
        fallbacks = report.fallbacks.len(),
        "board generated"
    );
    report
}

fn same_pair(a: Option<Cell>, b: Option<Cell>) -> Option<Token> {
    match (a?.token(), b?.token()) {
        (Some(x), Some(y)) if x == y => Some(x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_board_has_no_matches() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (grid, report) = generate(8, 8, 3, &mut rng);
            assert!(report.is_clean());
            assert_eq!(grid.count_empty(), 0);
            assert!(find_matches(&grid).is_empty(), "seed {seed}:\n{grid}");
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = generate(6, 9, 5, &mut StdRng::seed_from_u64(7)).0;
        let b = generate(6, 9, 5, &mut StdRng::seed_from_u64(7)).0;
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_kind_falls_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let (grid, report) = generate(3, 3, 1, &mut rng);
        assert_eq!(grid.count_empty(), 0);
        assert!(!report.is_clean());
        // Column-major scan: (0,2) is the first cell with two placed cells below it.
        assert_eq!(report.fallbacks[0], Pos::new(0, 2));
    }
}
