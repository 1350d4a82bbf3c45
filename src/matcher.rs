//! Match detection: maximal runs of three or more along rows and columns.

use crate::grid::{Cell, Grid, Pos, Token};
use std::collections::{BTreeSet, HashMap};

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Maximal contiguous same-kind cells along one axis. `start` is the left or bottom end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: Pos,
    pub axis: Axis,
    pub len: usize,
    pub token: Token,
}

impl Run {
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.len).map(move |i| match self.axis {
            Axis::Horizontal => Pos::new(self.start.x + i, self.start.y),
            Axis::Vertical => Pos::new(self.start.x, self.start.y + i),
        })
    }
}

/// Result of one detection pass over the whole grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Rows first (bottom to top), then columns (left to right).
    pub runs: Vec<Run>,
    /// Union of all run cells, deduplicated.
    pub cells: BTreeSet<Pos>,
}

impl MatchReport {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Runs merged where they share a cell (L, T and + shapes become one group).
    /// Groups are ordered by their smallest cell.
    pub fn groups(&self) -> Vec<BTreeSet<Pos>> {
        let mut parent: Vec<usize> = (0..self.runs.len()).collect();
        fn root(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        let mut owner: HashMap<Pos, usize> = HashMap::new();
        for (i, run) in self.runs.iter().enumerate() {
            for pos in run.cells() {
                if let Some(&j) = owner.get(&pos) {
                    let (a, b) = (root(&mut parent, i), root(&mut parent, j));
                    parent[a] = b;
                } else {
                    owner.insert(pos, i);
                }
            }
        }
        let mut by_root: HashMap<usize, BTreeSet<Pos>> = HashMap::new();
        for (i, run) in self.runs.iter().enumerate() {
            let r = root(&mut parent, i);
            by_root.entry(r).or_default().extend(run.cells());
        }
        let mut groups: Vec<_> = by_root.into_values().collect();
        groups.sort_by_key(|g| g.first().copied());
        groups
    }
}

/// Scan every row left to right and every column bottom to top.
pub fn find_matches(grid: &Grid) -> MatchReport {
    let mut report = MatchReport::default();
    for y in 0..grid.height() {
        scan_line(
            &mut report,
            Axis::Horizontal,
            (0..grid.width()).map(|x| (Pos::new(x, y), grid.cell(x, y).unwrap_or_default())),
        );
    }
    for x in 0..grid.width() {
        scan_line(
            &mut report,
            Axis::Vertical,
            (0..grid.height()).map(|y| (Pos::new(x, y), grid.cell(x, y).unwrap_or_default())),
        );
    }
    report
}

fn scan_line(report: &mut MatchReport, axis: Axis, line: impl Iterator<Item = (Pos, Cell)>) {
    let mut current: Option<(Pos, Token, usize)> = None;
    let flush = |current: Option<(Pos, Token, usize)>, report: &mut MatchReport| {
        if let Some((start, token, len)) = current {
            if len >= MIN_RUN {
                let run = Run { start, axis, len, token };
                report.cells.extend(run.cells());
                report.runs.push(run);
            }
        }
    };
    for (pos, cell) in line {
        current = match (current, cell.token()) {
            (Some((start, t, len)), Some(token)) if t == token => Some((start, t, len + 1)),
            (prev, token) => {
                flush(prev, report);
                token.map(|t| (pos, t, 1))
            }
        };
    }
    flush(current, report);
}

/// True if the row or column through `pos` holds a run of at least [`MIN_RUN`].
pub fn has_run_through(grid: &Grid, pos: Pos) -> bool {
    has_run_through_with(pos, |x, y| grid.cell(x, y))
}

/// Same as [`has_run_through`] but reads cells through `cell_at`, which returns
/// `None` outside the grid. Lets callers test a hypothetical board without mutating one.
pub(crate) fn has_run_through_with(pos: Pos, cell_at: impl Fn(usize, usize) -> Option<Cell>) -> bool {
    let Some(Cell::Token(token)) = cell_at(pos.x, pos.y) else {
        return false;
    };
    let same = |x: usize, y: usize| cell_at(x, y) == Some(Cell::Token(token));

    let mut horizontal = 1;
    let mut x = pos.x;
    while x > 0 && same(x - 1, pos.y) {
        horizontal += 1;
        x -= 1;
    }
    x = pos.x + 1;
    while same(x, pos.y) {
        horizontal += 1;
        x += 1;
    }
    if horizontal >= MIN_RUN {
        return true;
    }

    let mut vertical = 1;
    let mut y = pos.y;
    while y > 0 && same(pos.x, y - 1) {
        vertical += 1;
        y -= 1;
    }
    y = pos.y + 1;
    while same(pos.x, y) {
        vertical += 1;
        y += 1;
    }
    vertical >= MIN_RUN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_run_of_four_is_one_run() {
        let g = grid(&["AAAA"]);
        let m = find_matches(&g);
        assert_eq!(m.run_count(), 1);
        assert_eq!(m.runs[0].len, 4);
        assert_eq!(m.cells.len(), 4);
    }

    #[test]
    fn test_no_match_with_center_different() {
        let g = grid(&["AAA", "ABA", "AAA"]);
        // Edge rows of an all-A ring are runs of three.
        assert!(!find_matches(&g).is_empty());
        let g = grid(&["AAB", "ABA", "BAA"]);
        assert!(find_matches(&g).is_empty());
    }

    #[test]
    fn test_t_shape_dedupes_shared_cell() {
        let g = grid(&["BAB", "BAB", "AAA"]);
        let m = find_matches(&g);
        assert_eq!(m.run_count(), 2);
        assert_eq!(m.cells.len(), 5);
        let groups = m.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 5);
    }

    #[test]
    fn test_separate_runs_stay_separate_groups() {
        let g = grid(&["CCC", "ABA", "BBB"]);
        let m = find_matches(&g);
        assert_eq!(m.run_count(), 2);
        assert_eq!(m.groups().len(), 2);
    }

    #[test]
    fn test_empty_cells_break_runs() {
        let g = grid(&["AA.A", "...."]);
        assert!(find_matches(&g).is_empty());
    }

    #[test]
    fn test_has_run_through() {
        let g = grid(&["A..", "A..", "ABB"]);
        assert!(has_run_through(&g, Pos::new(0, 0)));
        assert!(has_run_through(&g, Pos::new(0, 2)));
        assert!(!has_run_through(&g, Pos::new(1, 0)));
        assert!(!has_run_through(&g, Pos::new(2, 2)));
    }
}
