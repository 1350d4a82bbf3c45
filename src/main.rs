//! gemcascade: match-3 puzzle in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use gemcascade::EngineConfig;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Options that affect the host only, not the rules.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Delay between cascade passes; zero settles instantly.
    pub pass_delay: Duration,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = args.engine_config();
    config.validate().context("invalid board configuration")?;
    let host = HostConfig {
        pass_delay: Duration::from_millis(args.pass_delay_ms),
    };
    let mut app = App::new(config, host, theme)?;
    app.run()?;
    Ok(())
}

/// Logs go to `path` (the terminal belongs to the UI). No path, no logging.
fn init_tracing(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(log = %path.display(), "tracing initialized");
    Ok(())
}

/// Match-3 puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "gemcascade",
    version,
    about = "Match-3 puzzle in the terminal. Swap neighbouring gems to line up three or more.",
    long_about = "gemcascade is a match-3 puzzle in the terminal.\n\n\
        Swap two neighbouring gems to make a line of three or more of the same kind. \
        Matched gems vanish, the gems above fall down, new gems drop in, and any new \
        lines clear in a cascade. A move is spent once the cascade settles.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor   Space / Enter  Pick, then swap\n  \
        Esc            Drop pick     n              New board      q  Quit"
)]
pub struct Args {
    /// Board width in cells.
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub width: usize,

    /// Board height in cells.
    #[arg(long, default_value = "8", value_name = "ROWS")]
    pub height: usize,

    /// Number of distinct gem kinds (3-6).
    #[arg(short, long, default_value = "5", value_name = "N")]
    pub kinds: u8,

    /// Moves available before the game ends.
    #[arg(short, long, default_value = "20", value_name = "N")]
    pub moves: u32,

    /// Most passes a single cascade may run (default: twice width + height).
    #[arg(long, value_name = "N")]
    pub cascade_cap: Option<usize>,

    /// Seed for the starting board.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Seed for gems that drop in after a clear.
    #[arg(long, value_name = "SEED")]
    pub refill_seed: Option<u64>,

    /// Pause between cascade passes in ms, so each pass is visible. 0 settles instantly.
    #[arg(long, default_value = "250", value_name = "MS")]
    pub pass_delay_ms: u64,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write tracing output to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            width: self.width,
            height: self.height,
            kinds: self.kinds,
            cascade_cap: self.cascade_cap,
            move_budget: self.moves,
            board_seed: self.seed,
            refill_seed: self.refill_seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_to_engine_config() {
        let args = Args::parse_from([
            "gemcascade", "--width", "6", "--height", "7", "-k", "4", "-m", "12", "--seed", "9",
        ]);
        let config = args.engine_config();
        assert_eq!(config.width, 6);
        assert_eq!(config.height, 7);
        assert_eq!(config.kinds, 4);
        assert_eq!(config.move_budget, 12);
        assert_eq!(config.board_seed, Some(9));
        assert_eq!(config.refill_seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_palette_alias() {
        let args = Args::parse_from(["gemcascade", "--palette", "colourblind"]);
        assert_eq!(args.palette, Palette::Colorblind);
    }
}
