use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{CellContent, GridSnapshot, TrialRecord};
use crate::metrics::GameMetrics;

/// Per-frame figures drawn around the grid
#[derive(Debug, Clone, Default)]
pub struct Hud {
    /// Current snake length
    pub length: usize,
    /// One-based trial number
    pub trial: usize,
    pub max_trials: Option<usize>,
    pub speed: &'static str,
    pub paused: bool,
    /// Extra line under the header (debug dump, notices)
    pub status: Option<String>,
    /// Set while the last trial's result is on screen
    pub game_over: Option<TrialRecord>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &GridSnapshot,
        hud: &Hud,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Length(1), // Status
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(hud, metrics), chunks[0]);
        frame.render_widget(self.render_status(hud), chunks[1]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[2])[1];

        match hud.game_over {
            Some(record) => frame.render_widget(self.render_game_over(&record, hud), game_area),
            None => frame.render_widget(self.render_grid(snapshot), game_area),
        }

        frame.render_widget(self.render_controls(), chunks[3]);
    }

    fn render_grid(&self, snapshot: &GridSnapshot) -> Paragraph<'_> {
        let lines: Vec<Line> = snapshot
            .rows()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|content| {
                        let (glyph, style) = cell_style(*content);
                        Span::styled(glyph, style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(format!(" A* Snake {0}x{0} ", snapshot.size())),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, hud: &Hud, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let trial = match hud.max_trials {
            Some(max) => format!("{}/{}", hud.trial, max),
            None => hud.trial.to_string(),
        };
        let path = metrics
            .last_path_len
            .map_or_else(|| "-".to_string(), |len| len.to_string());
        let last = metrics
            .last_score
            .map_or_else(|| "-".to_string(), |score| score.to_string());

        let text = vec![
            Line::from(vec![
                Span::styled("Length: ", label),
                Span::styled(
                    hud.length.to_string(),
                    value.add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Trial: ", label),
                Span::styled(trial, value),
                Span::raw("    "),
                Span::styled("High: ", label),
                Span::styled(metrics.high_score.to_string(), value),
                Span::raw("    "),
                Span::styled("Last: ", label),
                Span::styled(last, value),
                Span::raw("    "),
                Span::styled("Time: ", label),
                Span::styled(metrics.format_time(), value),
            ]),
            Line::from(vec![
                Span::styled("Path: ", label),
                Span::styled(path, value),
                Span::raw("    "),
                Span::styled("Expanded: ", label),
                Span::styled(metrics.last_expanded.to_string(), value),
                Span::raw("    "),
                Span::styled("Ticks: ", label),
                Span::styled(metrics.trial_ticks.to_string(), value),
                Span::raw("    "),
                Span::styled("Fallback: ", label),
                Span::styled(metrics.fallback_moves.to_string(), value),
                Span::raw("    "),
                Span::styled("Speed: ", label),
                Span::styled(hud.speed, value),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_status(&self, hud: &Hud) -> Paragraph<'_> {
        let mut spans = Vec::new();
        if hud.paused {
            spans.push(Span::styled(
                "PAUSED ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(status) = &hud.status {
            spans.push(Span::styled(
                status.clone(),
                Style::default().fg(Color::Gray),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, record: &TrialRecord, hud: &Hud) -> Paragraph<'_> {
        let finished = hud.max_trials.is_some_and(|max| hud.trial >= max);
        let prompt = if finished {
            Line::from(vec![
                Span::styled("All trials done. Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ])
        } else {
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for the next trial or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ])
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    record.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Ended by: ", Style::default().fg(Color::Yellow)),
                Span::styled(record.cause.as_str(), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" after {} ticks", record.ticks),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            prompt,
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let text = vec![
            Line::from(vec![
                Span::styled("↑↓←→", key),
                Span::raw(" or "),
                Span::styled("WASD", key),
                Span::raw(" to steer | "),
                Span::styled("Space", key),
                Span::raw(" pause | "),
                Span::styled("N", key),
                Span::raw(" step | "),
                Span::styled("1-4", key),
                Span::raw(" speed"),
            ]),
            Line::from(vec![
                Span::styled("?", key),
                Span::raw(" debug | "),
                Span::styled("R", key),
                Span::raw(" restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Glyph and style for one cell, two columns wide
pub fn cell_style(content: CellContent) -> (&'static str, Style) {
    match content {
        CellContent::Head => (
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        CellContent::Body => ("□ ", Style::default().fg(Color::Green)),
        CellContent::Food => (
            "O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        CellContent::PathMarker => ("* ", Style::default().fg(Color::Yellow)),
        CellContent::Empty => (". ", Style::default().fg(Color::DarkGray)),
    }
}
