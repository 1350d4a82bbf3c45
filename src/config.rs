//! Engine configuration.

use crate::error::ConfigError;

/// Smallest side length on which a run of three fits.
pub const MIN_SIDE: usize = 3;
/// Largest side length accepted.
pub const MAX_SIDE: usize = 64;
pub const MIN_KINDS: u8 = 3;
/// Matches the six token colours of the terminal theme.
pub const MAX_KINDS: u8 = 6;

pub const DEFAULT_WIDTH: usize = 8;
pub const DEFAULT_HEIGHT: usize = 8;
pub const DEFAULT_KINDS: u8 = 5;
pub const DEFAULT_MOVE_BUDGET: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    /// Number of distinct token kinds.
    pub kinds: u8,
    /// Pass cap per cascade; `None` uses twice `width + height`.
    pub cascade_cap: Option<usize>,
    /// Moves the player starts with. Consumed by the scoreboard, not the board.
    pub move_budget: u32,
    /// Seed for the initial board; `None` draws from the OS.
    pub board_seed: Option<u64>,
    /// Seed for refill tokens; `None` draws from the OS.
    pub refill_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            kinds: DEFAULT_KINDS,
            cascade_cap: None,
            move_budget: DEFAULT_MOVE_BUDGET,
            board_seed: None,
            refill_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_SIDE || self.height < MIN_SIDE {
            return Err(ConfigError::TooSmall {
                width: self.width,
                height: self.height,
                min: MIN_SIDE,
            });
        }
        if self.width > MAX_SIDE || self.height > MAX_SIDE {
            return Err(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
                max: MAX_SIDE,
            });
        }
        if !(MIN_KINDS..=MAX_KINDS).contains(&self.kinds) {
            return Err(ConfigError::Kinds {
                kinds: self.kinds,
                min: MIN_KINDS,
                max: MAX_KINDS,
            });
        }
        if self.cascade_cap == Some(0) {
            return Err(ConfigError::ZeroCascadeCap);
        }
        if self.move_budget == 0 {
            return Err(ConfigError::ZeroMoveBudget);
        }
        Ok(())
    }

    /// Effective pass cap. Legitimate gravity settles within `width + height`
    /// passes; the default doubles that.
    pub fn effective_cascade_cap(&self) -> usize {
        self.cascade_cap
            .unwrap_or(2 * (self.width + self.height))
            .max(1)
    }

    /// Same config with both seeds fixed.
    pub fn seeded(mut self, board_seed: u64, refill_seed: u64) -> Self {
        self.board_seed = Some(board_seed);
        self.refill_seed = Some(refill_seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = EngineConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.effective_cascade_cap(), 32);
    }

    #[test]
    fn test_rejects_bad_values() {
        let small = EngineConfig { width: 2, ..EngineConfig::default() };
        assert!(matches!(small.validate(), Err(ConfigError::TooSmall { .. })));

        let large = EngineConfig { height: 65, ..EngineConfig::default() };
        assert!(matches!(large.validate(), Err(ConfigError::TooLarge { .. })));

        let kinds = EngineConfig { kinds: 2, ..EngineConfig::default() };
        assert!(matches!(kinds.validate(), Err(ConfigError::Kinds { .. })));

        let cap = EngineConfig { cascade_cap: Some(0), ..EngineConfig::default() };
        assert_eq!(cap.validate(), Err(ConfigError::ZeroCascadeCap));

        let moves = EngineConfig { move_budget: 0, ..EngineConfig::default() };
        assert_eq!(moves.validate(), Err(ConfigError::ZeroMoveBudget));
    }
}
