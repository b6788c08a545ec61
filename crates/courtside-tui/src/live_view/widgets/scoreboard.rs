// Scoreboard: both teams in their colours, score, and game clock.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use courtside_core::models::{LiveBoxScore, LiveTeamLine};

use crate::palette::team_style;

pub fn render(frame: &mut Frame, area: Rect, snapshot: Option<&LiveBoxScore>) {
    let block = Block::default().borders(Borders::ALL).title("Scoreboard");
    let lines = match snapshot {
        Some(snapshot) => vec![
            Line::from(score_spans(&snapshot.away_team, &snapshot.home_team)),
            Line::from(Span::styled(
                clock_label(snapshot),
                Style::default().fg(Color::Gray),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "Waiting for the first update...",
            Style::default().add_modifier(Modifier::DIM),
        ))],
    };
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

/// "AWY 98  @  HOM 101", each team on its own colours.
pub fn score_spans(away: &LiveTeamLine, home: &LiveTeamLine) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            format!(" {} {} ", away.label(), away.points),
            team_style(away.label()),
        ),
        Span::raw("  @  "),
        Span::styled(
            format!(" {} {} ", home.label(), home.points),
            team_style(home.label()),
        ),
    ]
}

pub fn clock_label(snapshot: &LiveBoxScore) -> String {
    if snapshot.period == 0 {
        snapshot.game_status_text.clone()
    } else {
        format!("{} | Period {}", snapshot.game_status_text, snapshot.period)
    }
}
