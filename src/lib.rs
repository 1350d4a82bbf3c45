//! gemcascade: match-3 rules engine.
//!
//! A grid of typed tokens; adjacent swaps that form runs of three or more clear
//! those runs, the columns collapse, empty cells refill, and the board cascades
//! until no run remains. A move counts only once the cascade has settled.

pub mod board;
pub mod cascade;
pub mod config;
pub mod error;
pub mod events;
pub mod generator;
pub mod grid;
pub mod matcher;
pub mod scoreboard;
pub mod swap;

pub use board::{Board, Phase, SwapOutcome};
pub use cascade::{CascadeReport, PassReport, Step};
pub use config::EngineConfig;
pub use error::{ConfigError, EngineError, GridError};
pub use events::{BoardEvent, BoardObserver, EventLog};
pub use grid::{Cell, Grid, Pos, Token};
pub use matcher::{MatchReport, find_matches};
pub use scoreboard::Scoreboard;
pub use swap::{SwapVerdict, is_adjacent, would_create_match};
