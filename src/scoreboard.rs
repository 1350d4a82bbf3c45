//! Score and move accounting, fed by board signals.

use crate::cascade::CascadeReport;
use crate::events::BoardObserver;
use crate::grid::Pos;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub moves_left: u32,
    pub move_budget: u32,
    /// Settled cascades, i.e. moves spent.
    pub cascades: u32,
    pub best_pass: u32,
    /// Most passes seen in a single cascade.
    pub longest_cascade: usize,
    pub last_cascade: Option<CascadeReport>,
    game_over: bool,
}

impl Scoreboard {
    pub fn new(move_budget: u32) -> Self {
        Self {
            score: 0,
            moves_left: move_budget,
            move_budget,
            cascades: 0,
            best_pass: 0,
            longest_cascade: 0,
            last_cascade: None,
            game_over: move_budget == 0,
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

impl BoardObserver for Scoreboard {
    fn on_cells_cleared(&mut self, _cells: &[Pos], pass_score: u32) {
        self.score = self.score.saturating_add(pass_score);
        self.best_pass = self.best_pass.max(pass_score);
    }

    fn on_cascade_settled(&mut self, report: &CascadeReport) {
        if self.moves_left == 0 {
            warn!("cascade settled with no moves left; ignoring");
            return;
        }
        self.moves_left -= 1;
        self.cascades += 1;
        self.longest_cascade = self.longest_cascade.max(report.passes);
        self.last_cascade = Some(report.clone());
        if self.moves_left == 0 {
            self.game_over = true;
            info!(score = self.score, "out of moves");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(passes: usize, score: u32) -> CascadeReport {
        CascadeReport {
            passes,
            cleared: 3 * passes,
            runs: passes,
            score,
            capped: false,
        }
    }

    #[test]
    fn test_one_move_per_settle() {
        let mut sb = Scoreboard::new(2);
        sb.on_cells_cleared(&[], 200);
        sb.on_cells_cleared(&[], 250);
        sb.on_cascade_settled(&report(2, 450));
        assert_eq!(sb.score, 450);
        assert_eq!(sb.best_pass, 250);
        assert_eq!(sb.moves_left, 1);
        assert!(!sb.is_game_over());

        sb.on_cascade_settled(&report(1, 0));
        assert_eq!(sb.moves_left, 0);
        assert!(sb.is_game_over());
        assert_eq!(sb.longest_cascade, 2);
    }

    #[test]
    fn test_settle_at_zero_is_ignored() {
        let mut sb = Scoreboard::new(1);
        sb.on_cascade_settled(&report(1, 200));
        sb.on_cascade_settled(&report(1, 200));
        assert_eq!(sb.moves_left, 0);
        assert_eq!(sb.cascades, 1);
    }
}
