//! Cascade resolution: remove matches, apply gravity, refill, repeat until stable.

use crate::events::BoardObserver;
use crate::grid::{Cell, Grid, Pos, Token};
use crate::matcher::find_matches;
use rand::Rng;
use tracing::{debug, info, warn};

/// Score for the first token cleared in a pass.
pub const PASS_BASE_SCORE: u32 = 100;
/// Score for every further token cleared in the same pass.
pub const PASS_EXTRA_TOKEN_SCORE: u32 = 50;

/// Score for clearing `cleared` tokens in one pass: 100 + 50 per token beyond the first.
pub fn pass_score(cleared: usize) -> u32 {
    match cleared {
        0 => 0,
        n => PASS_BASE_SCORE.saturating_add(PASS_EXTRA_TOKEN_SCORE.saturating_mul((n - 1) as u32)),
    }
}

/// What one remove/gravity/refill pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// 1-based index within the cascade.
    pub pass: usize,
    pub cleared: usize,
    pub runs: usize,
    pub score: u32,
    pub moved: usize,
    pub spawned: usize,
}

/// Totals for a whole cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub passes: usize,
    pub cleared: usize,
    pub runs: usize,
    pub score: u32,
    /// Stopped by the pass cap with matches left on the board.
    pub capped: bool,
}

/// Result of advancing a cascade by one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Pass(PassReport),
    Settled(CascadeReport),
}

/// Set every listed cell to empty.
pub fn remove_cells(grid: &mut Grid, cells: impl IntoIterator<Item = Pos>) -> usize {
    let mut removed = 0;
    for pos in cells {
        if grid.cell(pos.x, pos.y).is_some_and(|c| !c.is_empty()) {
            grid.put(pos.x, pos.y, Cell::Empty);
            removed += 1;
        }
    }
    removed
}

/// Compact each column toward `y = 0`, keeping the order of surviving tokens.
/// Returns the number of tokens that moved.
pub fn apply_gravity<O: BoardObserver + ?Sized>(grid: &mut Grid, observer: &mut O) -> usize {
    let mut moved = 0;
    for x in 0..grid.width() {
        let Some(column) = grid.column_mut(x) else {
            continue;
        };
        let mut write = 0;
        for read in 0..column.len() {
            if column[read].is_empty() {
                continue;
            }
            if read != write {
                column[write] = column[read];
                column[read] = Cell::Empty;
                observer.on_token_moved(x, read, write);
                moved += 1;
            }
            write += 1;
        }
    }
    moved
}

/// Give every empty cell a random kind, top row first. New runs are allowed;
/// the next pass clears them.
pub fn refill<R: Rng + ?Sized, O: BoardObserver + ?Sized>(
    grid: &mut Grid,
    kinds: u8,
    rng: &mut R,
    observer: &mut O,
) -> usize {
    let kinds = kinds.max(1);
    let mut spawned = 0;
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            if grid.cell(x, y) == Some(Cell::Empty) {
                let token = Token(rng.gen_range(0..kinds));
                grid.put(x, y, Cell::Token(token));
                observer.on_token_spawned(Pos::new(x, y), token);
                spawned += 1;
            }
        }
    }
    spawned
}

/// One cascade in progress. Created when a swap is committed; drive it with
/// [`Cascade::step`] until it returns [`Step::Settled`].
#[derive(Debug, Clone)]
pub struct Cascade {
    cap: usize,
    kinds: u8,
    report: CascadeReport,
    settled: bool,
}

impl Cascade {
    pub fn new(kinds: u8, cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            kinds,
            report: CascadeReport::default(),
            settled: false,
        }
    }

    /// Totals so far.
    pub fn report(&self) -> &CascadeReport {
        &self.report
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Detect; if nothing matches (or the cap is spent) settle, otherwise run one
    /// remove/gravity/refill pass. Stepping a settled cascade returns its report
    /// again without signalling.
    pub fn step<R: Rng + ?Sized, O: BoardObserver + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut O,
    ) -> Step {
        if self.settled {
            return Step::Settled(self.report.clone());
        }

        let matches = find_matches(grid);
        if matches.is_empty() {
            return self.settle(observer);
        }
        if self.report.passes >= self.cap {
            warn!(
                passes = self.report.passes,
                remaining = matches.cells.len(),
                "cascade cap reached; accepting board as stable"
            );
            self.report.capped = true;
            observer.on_cascade_capped(self.report.passes);
            return self.settle(observer);
        }

        let cells: Vec<Pos> = matches.cells.iter().copied().collect();
        let cleared = remove_cells(grid, cells.iter().copied());
        let score = pass_score(cleared);
        observer.on_cells_cleared(&cells, score);
        let moved = apply_gravity(grid, observer);
        let spawned = refill(grid, self.kinds, rng, observer);

        self.report.passes += 1;
        self.report.cleared += cleared;
        self.report.runs += matches.run_count();
        self.report.score = self.report.score.saturating_add(score);

        let pass = PassReport {
            pass: self.report.passes,
            cleared,
            runs: matches.run_count(),
            score,
            moved,
            spawned,
        };
        debug!(?pass, "cascade pass");
        Step::Pass(pass)
    }

    fn settle<O: BoardObserver + ?Sized>(&mut self, observer: &mut O) -> Step {
        self.settled = true;
        info!(
            passes = self.report.passes,
            cleared = self.report.cleared,
            score = self.report.score,
            capped = self.report.capped,
            "cascade settled"
        );
        observer.on_cascade_settled(&self.report);
        Step::Settled(self.report.clone())
    }
}

/// Run a cascade to completion on `grid`.
pub fn settle<R: Rng + ?Sized, O: BoardObserver + ?Sized>(
    grid: &mut Grid,
    kinds: u8,
    cap: usize,
    rng: &mut R,
    observer: &mut O,
) -> CascadeReport {
    let mut cascade = Cascade::new(kinds, cap);
    loop {
        if let Step::Settled(report) = cascade.step(grid, rng, observer) {
            return report;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BoardEvent, EventLog};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pass_score() {
        assert_eq!(pass_score(0), 0);
        assert_eq!(pass_score(3), 200);
        assert_eq!(pass_score(4), 250);
        assert_eq!(pass_score(5), 300);
    }

    #[test]
    fn test_gravity_compacts_column() {
        // Column [A, _, B, _, C] with index 0 at the bottom.
        let mut g = Grid::from_rows(&["C", ".", "B", ".", "A"]).unwrap();
        let mut log = EventLog::new();
        let moved = apply_gravity(&mut g, &mut log);
        assert_eq!(g, Grid::from_rows(&[".", ".", "C", "B", "A"]).unwrap());
        assert_eq!(moved, 2);
        assert_eq!(
            log.events,
            vec![
                BoardEvent::TokenMoved { x: 0, from_y: 2, to_y: 1 },
                BoardEvent::TokenMoved { x: 0, from_y: 4, to_y: 2 },
            ]
        );
    }

    #[test]
    fn test_refill_fills_every_empty_cell() {
        let mut g = Grid::from_rows(&["..", "A.", "AB"]).unwrap();
        let mut log = EventLog::new();
        let spawned = refill(&mut g, 4, &mut StdRng::seed_from_u64(3), &mut log);
        assert_eq!(spawned, 3);
        assert_eq!(g.count_empty(), 0);
        assert_eq!(g.get(Pos::new(0, 0)).unwrap(), Cell::Token(Token(0)));
        assert_eq!(log.events.len(), 3);
    }

    #[test]
    fn test_run_of_four_scores_250() {
        // Row [A, A, B, A]; setting (2,0) to A completes a run of four.
        let mut g = Grid::from_rows(&["BCDB", "AABA"]).unwrap();
        g.set(Pos::new(2, 0), Cell::Token(Token(0))).unwrap();
        let matches = find_matches(&g);
        assert_eq!(matches.run_count(), 1);
        assert_eq!(
            matches.cells.iter().copied().collect::<Vec<_>>(),
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0), Pos::new(3, 0)]
        );

        let mut log = EventLog::new();
        let mut cascade = Cascade::new(4, 16);
        let mut rng = StdRng::seed_from_u64(11);
        match cascade.step(&mut g, &mut rng, &mut log) {
            Step::Pass(p) => {
                assert_eq!(p.cleared, 4);
                assert_eq!(p.score, 250);
            }
            Step::Settled(_) => panic!("expected a pass"),
        }
        assert!(matches!(
            &log.events[0],
            BoardEvent::CellsCleared { cells, pass_score: 250 } if cells.len() == 4
        ));
    }

    #[test]
    fn test_settle_leaves_no_matches() {
        for seed in 0..30 {
            let mut g = Grid::from_rows(&["ABAB", "AAAB", "BABA", "BBBA"]).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut log = EventLog::new();
            let report = settle(&mut g, 4, 64, &mut rng, &mut log);
            assert!(report.passes >= 1);
            assert!(!report.capped);
            assert!(find_matches(&g).is_empty());
            assert_eq!(g.count_empty(), 0);
            assert_eq!(
                log.count(|e| matches!(e, BoardEvent::CascadeSettled(_))),
                1
            );
        }
    }

    #[test]
    fn test_cap_stops_endless_cascade() {
        // A single kind refills into a match every time.
        let mut g = Grid::from_rows(&["AAA", "AAA", "AAA"]).unwrap();
        let mut log = EventLog::new();
        let report = settle(&mut g, 1, 3, &mut StdRng::seed_from_u64(0), &mut log);
        assert!(report.capped);
        assert_eq!(report.passes, 3);
        assert_eq!(report.score, 3 * pass_score(9));
        assert!(log.events.contains(&BoardEvent::CascadeCapped { passes: 3 }));
        assert!(matches!(log.events.last(), Some(BoardEvent::CascadeSettled(r)) if r.capped));
    }

    #[test]
    fn test_step_after_settle_is_silent() {
        let mut g = Grid::from_rows(&["AB", "BA"]).unwrap();
        let mut log = EventLog::new();
        let mut cascade = Cascade::new(2, 4);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(cascade.step(&mut g, &mut rng, &mut log), Step::Settled(_)));
        assert!(matches!(cascade.step(&mut g, &mut rng, &mut log), Step::Settled(_)));
        assert_eq!(log.events.len(), 1);
        assert!(cascade.is_settled());
    }
}
