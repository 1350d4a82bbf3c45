//! Layout and drawing: board, sidebar, game over.

use crate::app::{App, Screen};
use gemcascade::{Cell, Phase, Pos};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Terminal columns per board cell.
const CELL_WIDTH: u16 = 3;
const SIDEBAR_WIDTH: u16 = 28;

/// Board size in terminal cells, border included.
fn board_outer_size(width: usize, height: usize) -> (u16, u16) {
    (width as u16 * CELL_WIDTH + 2, height as u16 + 2)
}

/// Board rect and sidebar rect, centred in `area`.
fn layout(area: Rect, width: usize, height: usize) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(width, height);
    let total_w = bw + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(bh) / 2;
    let board = Rect {
        x,
        y,
        width: bw.min(area.width),
        height: bh.min(area.height),
    };
    let sidebar = Rect {
        x: (x + bw).min(area.x + area.width),
        y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(bw)),
        height: bh.max(12).min(area.height),
    };
    (board, sidebar)
}

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let grid = app.board.grid();
    let (board_area, sidebar_area) = layout(area, grid.width(), grid.height());
    draw_board(frame, app, board_area);
    draw_sidebar(frame, app, sidebar_area);
    if app.screen == Screen::GameOver {
        draw_game_over(frame, app, board_area);
    }
}

fn draw_board(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let grid = app.board.grid();
    let settling = app.board.phase() == Phase::Settling;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .title(Span::styled(" gemcascade ", Style::default().fg(theme.title)))
        .style(Style::default().bg(theme.bg));

    // Top row first.
    let lines: Vec<Line> = (0..grid.height())
        .rev()
        .map(|y| {
            let spans: Vec<Span> = (0..grid.width())
                .map(|x| {
                    let pos = Pos::new(x, y);
                    let cell = grid.get(pos).unwrap_or_default();
                    let (text, mut style) = match cell {
                        Cell::Empty => (String::from(" · "), Style::default().fg(theme.inactive_fg)),
                        Cell::Token(t) => (
                            format!(" {} ", t.letter()),
                            Style::default().fg(theme.token_color(t)).add_modifier(Modifier::BOLD),
                        ),
                    };
                    if settling && app.trail.cleared.contains(&pos) {
                        style = style.add_modifier(Modifier::SLOW_BLINK);
                    }
                    if app.selected == Some(pos) {
                        style = style.add_modifier(Modifier::UNDERLINED).bg(theme.div_line);
                    }
                    if app.cursor == pos && app.screen == Screen::Playing {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let sb = &app.scoreboard;
    let label = Style::default().fg(theme.inactive_fg);
    let value = Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD);
    let row = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(format!("{name:<9}"), label), Span::styled(v, value)])
    };

    let mut lines = vec![
        row("Score", sb.score.to_string()),
        row("Moves", format!("{}/{}", sb.moves_left, sb.move_budget)),
        row("Best", sb.best_pass.to_string()),
        row("Chain", sb.longest_cascade.to_string()),
    ];
    if let Some(last) = &sb.last_cascade {
        lines.push(row("Last", format!("{} x{} (+{})", last.cleared, last.passes, last.score)));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        app.status.clone(),
        Style::default().fg(theme.title),
    )));
    lines.push(Line::default());
    for help in ["←↓↑→/hjkl move", "space  pick / swap", "esc    drop pick", "n      new board", "q      quit"] {
        lines.push(Line::from(Span::styled(help, label)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_game_over(frame: &mut Frame, app: &App, board: Rect) {
    let theme = &app.theme;
    let popup = Layout::vertical([Constraint::Length(5)])
        .flex(ratatui::layout::Flex::Center)
        .split(board)[0];
    let lines = vec![
        Line::from(Span::styled(
            "OUT OF MOVES",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Final score: {}", app.scoreboard.score)),
        Line::from(Span::styled("n: new board  q: quit", Style::default().fg(theme.inactive_fg))),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).style(Style::default().bg(theme.bg))),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fits_board() {
        let area = Rect::new(0, 0, 100, 30);
        let (board, sidebar) = layout(area, 8, 8);
        assert_eq!((board.width, board.height), (26, 10));
        assert_eq!(sidebar.x, board.x + board.width);
        assert!(sidebar.x + sidebar.width <= area.width);
    }

    #[test]
    fn test_layout_clamps_to_small_terminal() {
        let area = Rect::new(0, 0, 20, 5);
        let (board, sidebar) = layout(area, 8, 8);
        assert!(board.width <= 20 && board.height <= 5);
        assert_eq!(sidebar.width, 0);
    }
}
