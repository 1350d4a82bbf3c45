//! App: terminal init, main loop, cursor and swap handling.

use crate::HostConfig;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use gemcascade::{
    Board, BoardObserver, EngineConfig, EngineError, Phase, Pos, Scoreboard, Step, SwapVerdict,
};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Poll timeout, roughly 60 frames per second.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

/// Cells cleared by the latest pass, for highlighting.
#[derive(Debug, Default)]
pub struct PassTrail {
    pub cleared: Vec<Pos>,
}

impl BoardObserver for PassTrail {
    fn on_swap_accepted(&mut self, _a: Pos, _b: Pos) {
        self.cleared.clear();
    }

    fn on_cells_cleared(&mut self, cells: &[Pos], _pass_score: u32) {
        self.cleared = cells.to_vec();
    }
}

pub struct App {
    config: EngineConfig,
    host: HostConfig,
    pub theme: Theme,
    pub board: Board,
    pub scoreboard: Scoreboard,
    pub trail: PassTrail,
    pub cursor: Pos,
    pub selected: Option<Pos>,
    pub screen: Screen,
    pub status: String,
    /// Boards started this session; offsets fixed seeds so `n` gives a new board.
    games: u64,
    last_step: Instant,
}

impl App {
    pub fn new(config: EngineConfig, host: HostConfig, theme: Theme) -> Result<Self> {
        let board = Board::new(config.clone())?;
        let scoreboard = Scoreboard::new(config.move_budget);
        Ok(Self {
            cursor: Pos::new(config.width / 2, config.height / 2),
            config,
            host,
            theme,
            board,
            scoreboard,
            trail: PassTrail::default(),
            selected: None,
            screen: Screen::Playing,
            status: String::from("Pick a gem"),
            games: 1,
            last_step: Instant::now(),
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        let offset = self.games;
        let config = EngineConfig {
            board_seed: self.config.board_seed.map(|s| s.wrapping_add(offset)),
            refill_seed: self.config.refill_seed.map(|s| s.wrapping_add(offset)),
            ..self.config.clone()
        };
        self.board = Board::new(config)?;
        self.scoreboard = Scoreboard::new(self.config.move_budget);
        self.trail = PassTrail::default();
        self.selected = None;
        self.screen = Screen::Playing;
        self.status = String::from("New board");
        self.games += 1;
        info!(game = self.games, "new board");
        Ok(())
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let max_x = self.config.width as isize - 1;
        let max_y = self.config.height as isize - 1;
        let x = (self.cursor.x as isize + dx).clamp(0, max_x);
        let y = (self.cursor.y as isize + dy).clamp(0, max_y);
        self.cursor = Pos::new(x as usize, y as usize);
    }

    fn select(&mut self) {
        if self.screen == Screen::GameOver {
            return;
        }
        let Some(from) = self.selected else {
            self.selected = Some(self.cursor);
            return;
        };
        if from == self.cursor {
            self.selected = None;
            return;
        }
        let mut observer = (&mut self.scoreboard, &mut self.trail);
        match self.board.begin_swap(from, self.cursor, &mut observer) {
            Ok(SwapVerdict::Valid) => {
                self.selected = None;
                self.status = String::from("Match!");
                self.last_step = Instant::now();
                if self.host.pass_delay.is_zero() {
                    self.settle_now();
                }
            }
            Ok(verdict) => {
                debug!(?verdict, %from, to = %self.cursor, "swap refused");
                self.selected = Some(self.cursor);
                self.status = String::from(match verdict {
                    SwapVerdict::NotAdjacent => "Pick a neighbouring gem",
                    SwapVerdict::EmptyCell => "Nothing to swap there",
                    _ => "No match there",
                });
            }
            Err(EngineError::Busy) => self.status = String::from("Wait for the cascade"),
            Err(e) => self.status = e.to_string(),
        }
    }

    fn settle_now(&mut self) {
        let mut observer = (&mut self.scoreboard, &mut self.trail);
        if let Ok(report) = self.board.finish(&mut observer) {
            self.after_settle(report.passes, report.score, report.capped);
        }
    }

    /// Run one cascade pass once the pass delay has elapsed.
    fn tick_cascade(&mut self, now: Instant) {
        if self.board.phase() != Phase::Settling
            || now.duration_since(self.last_step) < self.host.pass_delay
        {
            return;
        }
        self.last_step = now;
        let mut observer = (&mut self.scoreboard, &mut self.trail);
        match self.board.step(&mut observer) {
            Ok(Step::Pass(pass)) => {
                self.status = format!("Pass {}: +{}", pass.pass, pass.score);
            }
            Ok(Step::Settled(report)) => {
                self.after_settle(report.passes, report.score, report.capped);
            }
            Err(_) => {}
        }
    }

    fn after_settle(&mut self, passes: usize, score: u32, capped: bool) {
        self.trail.cleared.clear();
        self.status = match (passes, capped) {
            (_, true) => format!("Cascade capped after {passes} passes: +{score}"),
            (1, false) => format!("+{score}"),
            (n, false) => format!("{n}x cascade: +{score}"),
        };
        if self.scoreboard.is_game_over() {
            self.screen = Screen::GameOver;
            self.selected = None;
            info!(score = self.scoreboard.score, "game over");
        }
    }

    /// Returns false when the app should exit.
    fn apply_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Quit => return Ok(false),
            Action::NewGame => self.reset_game()?,
            Action::Cancel => self.selected = None,
            Action::Up => self.move_cursor(0, 1),
            Action::Down => self.move_cursor(0, -1),
            Action::Left => self.move_cursor(-1, 0),
            Action::Right => self.move_cursor(1, 0),
            Action::Select => self.select(),
            Action::None => {}
        }
        Ok(true)
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| crate::ui::draw(f, self))?;

            self.tick_cascade(now);

            let timeout = FRAME.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if !self.apply_action(key_to_action(key))? {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
