//! Signals from the engine to scoring and presentation collaborators.

use crate::cascade::CascadeReport;
use crate::grid::{Pos, Token};

/// Receiver of board signals. Every method defaults to doing nothing, so a
/// collaborator implements only what it consumes.
///
/// Per accepted swap the order is: `on_swap_accepted` once, then for each pass
/// `on_cells_cleared`, the `on_token_moved` calls of gravity and the
/// `on_token_spawned` calls of refill, then `on_cascade_capped` if the pass cap
/// was hit, and finally `on_cascade_settled` exactly once.
pub trait BoardObserver {
    fn on_swap_accepted(&mut self, _a: Pos, _b: Pos) {}

    fn on_cells_cleared(&mut self, _cells: &[Pos], _pass_score: u32) {}

    /// A token in column `x` fell from `from_y` to `to_y`.
    fn on_token_moved(&mut self, _x: usize, _from_y: usize, _to_y: usize) {}

    fn on_token_spawned(&mut self, _pos: Pos, _token: Token) {}

    /// The cascade stopped at the pass cap with matches still on the board.
    fn on_cascade_capped(&mut self, _passes: usize) {}

    /// The board is idle again. Move accounting hooks in here.
    fn on_cascade_settled(&mut self, _report: &CascadeReport) {}
}

impl BoardObserver for () {}

impl<T: BoardObserver + ?Sized> BoardObserver for &mut T {
    fn on_swap_accepted(&mut self, a: Pos, b: Pos) {
        (**self).on_swap_accepted(a, b);
    }
    fn on_cells_cleared(&mut self, cells: &[Pos], pass_score: u32) {
        (**self).on_cells_cleared(cells, pass_score);
    }
    fn on_token_moved(&mut self, x: usize, from_y: usize, to_y: usize) {
        (**self).on_token_moved(x, from_y, to_y);
    }
    fn on_token_spawned(&mut self, pos: Pos, token: Token) {
        (**self).on_token_spawned(pos, token);
    }
    fn on_cascade_capped(&mut self, passes: usize) {
        (**self).on_cascade_capped(passes);
    }
    fn on_cascade_settled(&mut self, report: &CascadeReport) {
        (**self).on_cascade_settled(report);
    }
}

/// Fan-out: both observers see every signal, first `A` then `B`.
impl<A: BoardObserver, B: BoardObserver> BoardObserver for (A, B) {
    fn on_swap_accepted(&mut self, a: Pos, b: Pos) {
        self.0.on_swap_accepted(a, b);
        self.1.on_swap_accepted(a, b);
    }
    fn on_cells_cleared(&mut self, cells: &[Pos], pass_score: u32) {
        self.0.on_cells_cleared(cells, pass_score);
        self.1.on_cells_cleared(cells, pass_score);
    }
    fn on_token_moved(&mut self, x: usize, from_y: usize, to_y: usize) {
        self.0.on_token_moved(x, from_y, to_y);
        self.1.on_token_moved(x, from_y, to_y);
    }
    fn on_token_spawned(&mut self, pos: Pos, token: Token) {
        self.0.on_token_spawned(pos, token);
        self.1.on_token_spawned(pos, token);
    }
    fn on_cascade_capped(&mut self, passes: usize) {
        self.0.on_cascade_capped(passes);
        self.1.on_cascade_capped(passes);
    }
    fn on_cascade_settled(&mut self, report: &CascadeReport) {
        self.0.on_cascade_settled(report);
        self.1.on_cascade_settled(report);
    }
}

/// Recorded signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    SwapAccepted { a: Pos, b: Pos },
    CellsCleared { cells: Vec<Pos>, pass_score: u32 },
    TokenMoved { x: usize, from_y: usize, to_y: usize },
    TokenSpawned { pos: Pos, token: Token },
    CascadeCapped { passes: usize },
    CascadeSettled(CascadeReport),
}

/// Observer that keeps every signal in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<BoardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count(&self, pred: impl Fn(&BoardEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl BoardObserver for EventLog {
    fn on_swap_accepted(&mut self, a: Pos, b: Pos) {
        self.events.push(BoardEvent::SwapAccepted { a, b });
    }
    fn on_cells_cleared(&mut self, cells: &[Pos], pass_score: u32) {
        self.events.push(BoardEvent::CellsCleared {
            cells: cells.to_vec(),
            pass_score,
        });
    }
    fn on_token_moved(&mut self, x: usize, from_y: usize, to_y: usize) {
        self.events.push(BoardEvent::TokenMoved { x, from_y, to_y });
    }
    fn on_token_spawned(&mut self, pos: Pos, token: Token) {
        self.events.push(BoardEvent::TokenSpawned { pos, token });
    }
    fn on_cascade_capped(&mut self, passes: usize) {
        self.events.push(BoardEvent::CascadeCapped { passes });
    }
    fn on_cascade_settled(&mut self, report: &CascadeReport) {
        self.events.push(BoardEvent::CascadeSettled(report.clone()));
    }
}
