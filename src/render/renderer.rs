use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{ColorTag, GameSnapshot};
use crate::leaderboard::{Leaderboard, LEADERBOARD_CAPACITY};

/// Everything that can be on screen
pub enum View<'a> {
    Menu {
        status: Option<&'a str>,
    },
    Playing {
        snapshot: Option<&'a GameSnapshot>,
    },
    GameOver {
        score: u32,
    },
    EnterName {
        board: &'a Leaderboard,
        row: usize,
        name: &'a str,
    },
    HighScores {
        board: &'a Leaderboard,
        highlight: Option<usize>,
        status: Option<&'a str>,
    },
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        frame.render_widget(self.render_header(view), chunks[0]);

        match view {
            View::Menu { status } => frame.render_widget(self.render_menu(*status), body),
            View::Playing { snapshot } => {
                frame.render_widget(self.render_grid(*snapshot), body)
            }
            View::GameOver { score } => frame.render_widget(self.render_game_over(*score), body),
            View::EnterName { board, row, name } => frame.render_widget(
                self.render_scores(board, Some(*row), Some(*name), None),
                body,
            ),
            View::HighScores {
                board,
                highlight,
                status,
            } => frame.render_widget(self.render_scores(board, *highlight, None, *status), body),
        }

        frame.render_widget(self.render_controls(view), chunks[2]);
    }

    fn render_header(&self, view: &View) -> Paragraph<'_> {
        let line = match view {
            View::Playing {
                snapshot: Some(snapshot),
            } => Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.snake.len().to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}ms", snapshot.state.speed_ms),
                    Style::default().fg(Color::White),
                ),
            ]),
            _ => Line::from(Span::styled(
                "S N A K E",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }

    fn render_grid(&self, snapshot: Option<&GameSnapshot>) -> Paragraph<'_> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(" Snake ");

        let Some(snapshot) = snapshot else {
            return Paragraph::new(vec![Line::from(""), Line::from("Get ready...")])
                .alignment(Alignment::Center)
                .block(block);
        };

        let grid = &snapshot.grid;
        let mut cells: Vec<Option<ColorTag>> = vec![None; grid.total_cells()];
        for cell in &snapshot.snake {
            if let Some(slot) = cells.get_mut(cell.position_index) {
                *slot = Some(cell.color);
            }
        }

        let mut lines = Vec::with_capacity(grid.cells() as usize);
        for row in 0..grid.cells() {
            let mut spans = Vec::with_capacity(grid.cells() as usize);

            for column in 0..grid.cells() {
                let index = (column + row * grid.cells()) as usize;

                let cell = match cells[index] {
                    Some(tag) => Span::styled(
                        if tag == ColorTag::Head { "■ " } else { "□ " },
                        segment_style(tag),
                    ),
                    None if index == snapshot.fruit.position_index => Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
    }

    fn render_menu(&self, status: Option<&str>) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  Play", Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled(
                    "H",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("      High scores", Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled("      Quit", Style::default().fg(Color::White)),
            ]),
        ];

        if let Some(status) = status {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Gray),
            )));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Main Menu "),
        )
    }

    fn render_game_over(&self, score: u32) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Checking the leaderboard...",
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_scores(
        &self,
        board: &Leaderboard,
        highlight: Option<usize>,
        editing: Option<&str>,
        status: Option<&str>,
    ) -> Paragraph<'_> {
        let mut text = vec![Line::from("")];

        if board.is_empty() {
            text.push(Line::from(Span::styled(
                "No scores yet",
                Style::default().fg(Color::DarkGray),
            )));
        }

        for (rank, entry) in board.entries().iter().take(LEADERBOARD_CAPACITY).enumerate() {
            let is_highlight = highlight == Some(rank);
            let name = match editing {
                Some(typed) if is_highlight => format!("{typed}_"),
                _ => entry.name.clone(),
            };

            let style = if is_highlight {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            text.push(Line::from(Span::styled(
                format!("{:>2}. {:<13} {:>6}", rank + 1, name, entry.score),
                style,
            )));
        }

        if let Some(status) = status {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Gray),
            )));
        }

        let title = if editing.is_some() {
            " New High Score! "
        } else {
            " High Scores "
        };

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title),
        )
    }

    fn render_controls(&self, view: &View) -> Paragraph<'_> {
        let line = match view {
            View::Playing { .. } => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::raw(" to abandon"),
            ]),
            View::EnterName { .. } => Line::from(vec![
                Span::raw("Type your name, "),
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::raw(" to save | "),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::raw(" to skip"),
            ]),
            View::HighScores { .. } | View::GameOver { .. } => Line::from(vec![
                Span::styled("Esc", Style::default().fg(Color::Cyan)),
                Span::raw(" back to menu"),
            ]),
            View::Menu { .. } => Line::from(vec![
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

fn segment_style(tag: ColorTag) -> Style {
    match tag {
        ColorTag::Head => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        ColorTag::Body1 => Style::default().fg(Color::Green),
        ColorTag::Body2 => Style::default().fg(Color::LightGreen),
        ColorTag::Body3 => Style::default().fg(Color::Yellow),
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
