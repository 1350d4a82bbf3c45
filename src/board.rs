//! Board: owns the grid, the RNGs and the Idle/Settling phase.
//!
//! A swap is one transaction: validate, apply, cascade to stability. Hosts that
//! want to pace the cascade call [`Board::begin_swap`] and then [`Board::step`]
//! once per pass; any other swap request in between is rejected with
//! [`EngineError::Busy`]. Hosts that don't care call [`Board::attempt_swap`].

use crate::cascade::{Cascade, CascadeReport, Step};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::events::BoardObserver;
use crate::generator::{GenerationReport, fill_without_matches};
use crate::grid::{Grid, Pos};
use crate::swap::{SwapVerdict, check_swap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Settling,
}

/// Result of [`Board::attempt_swap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Not committed; the grid is unchanged and no move is spent.
    Rejected(SwapVerdict),
    Settled(CascadeReport),
}

#[derive(Debug)]
pub struct Board {
    config: EngineConfig,
    grid: Grid,
    refill_rng: StdRng,
    cascade: Option<Cascade>,
    generation: GenerationReport,
}

impl Board {
    /// Validate `config` and generate a fresh board from its seeds.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let mut board_rng = match config.board_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let refill_rng = match config.refill_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rngs(config, &mut board_rng, refill_rng)
    }

    /// Generate with caller-supplied randomness. Seeds in `config` are ignored.
    pub fn with_rngs<R: Rng + ?Sized>(
        config: EngineConfig,
        board_rng: &mut R,
        refill_rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut grid = Grid::new(config.width, config.height);
        let generation = fill_without_matches(&mut grid, config.kinds, board_rng);
        info!(
            width = config.width,
            height = config.height,
            kinds = config.kinds,
            fallbacks = generation.fallbacks.len(),
            "board created"
        );
        Ok(Self {
            config,
            grid,
            refill_rng,
            cascade: None,
            generation,
        })
    }

    /// Adopt an existing grid. Width and height come from the grid.
    pub fn from_grid(
        mut config: EngineConfig,
        grid: Grid,
        refill_rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.width = grid.width();
        config.height = grid.height();
        config.validate()?;
        Ok(Self {
            config,
            grid,
            refill_rng,
            cascade: None,
            generation: GenerationReport::default(),
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fallback cells from initial generation.
    #[inline]
    pub fn generation(&self) -> &GenerationReport {
        &self.generation
    }

    pub fn phase(&self) -> Phase {
        if self.cascade.is_some() {
            Phase::Settling
        } else {
            Phase::Idle
        }
    }

    /// Read-only swap check. Rejected with `Busy` while settling.
    pub fn check_swap(&self, a: Pos, b: Pos) -> Result<SwapVerdict, EngineError> {
        if self.cascade.is_some() {
            return Err(EngineError::Busy);
        }
        Ok(check_swap(&self.grid, a, b)?)
    }

    /// Validate and, if valid, apply the swap and enter `Settling`.
    /// Emits `on_swap_accepted` for valid swaps only.
    #[instrument(skip(self, observer))]
    pub fn begin_swap<O: BoardObserver + ?Sized>(
        &mut self,
        a: Pos,
        b: Pos,
        observer: &mut O,
    ) -> Result<SwapVerdict, EngineError> {
        let verdict = self.check_swap(a, b)?;
        if !verdict.is_valid() {
            debug!(?verdict, "swap rejected");
            return Ok(verdict);
        }
        self.grid.swap(a, b)?;
        observer.on_swap_accepted(a, b);
        self.cascade = Some(Cascade::new(
            self.config.kinds,
            self.config.effective_cascade_cap(),
        ));
        Ok(verdict)
    }

    /// Advance the current cascade by one pass. Returns to `Idle` on `Step::Settled`.
    pub fn step<O: BoardObserver + ?Sized>(&mut self, observer: &mut O) -> Result<Step, EngineError> {
        let Some(cascade) = self.cascade.as_mut() else {
            return Err(EngineError::Idle);
        };
        let step = cascade.step(&mut self.grid, &mut self.refill_rng, observer);
        if matches!(step, Step::Settled(_)) {
            self.cascade = None;
        }
        Ok(step)
    }

    /// Run the current cascade to the end.
    pub fn finish<O: BoardObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<CascadeReport, EngineError> {
        loop {
            if let Step::Settled(report) = self.step(observer)? {
                return Ok(report);
            }
        }
    }

    /// Validate, apply and settle a swap in one call.
    #[instrument(skip(self, observer))]
    pub fn attempt_swap<O: BoardObserver + ?Sized>(
        &mut self,
        a: Pos,
        b: Pos,
        observer: &mut O,
    ) -> Result<SwapOutcome, EngineError> {
        let verdict = self.begin_swap(a, b, observer)?;
        if !verdict.is_valid() {
            return Ok(SwapOutcome::Rejected(verdict));
        }
        Ok(SwapOutcome::Settled(self.finish(observer)?))
    }
}
