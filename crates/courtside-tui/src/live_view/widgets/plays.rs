// Most recent plays, newest first.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use courtside_core::models::{LiveBoxScore, PlayByPlayEvent};

pub fn render(frame: &mut Frame, area: Rect, snapshot: Option<&LiveBoxScore>) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = snapshot
        .map(|s| recent_plays(s, visible))
        .unwrap_or_default()
        .into_iter()
        .map(play_line)
        .collect();
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Plays"));
    frame.render_widget(paragraph, area);
}

pub fn recent_plays(snapshot: &LiveBoxScore, limit: usize) -> Vec<&PlayByPlayEvent> {
    let mut plays: Vec<&PlayByPlayEvent> = snapshot.play_by_play.iter().collect();
    plays.sort_by(|a, b| b.event_num.cmp(&a.event_num));
    plays.truncate(limit);
    plays
}

fn play_line(play: &PlayByPlayEvent) -> Line<'static> {
    let clock = play.clock.as_deref().unwrap_or("--:--");
    Line::from(vec![
        Span::styled(format!("Q{} {clock:>5} ", play.period), Style::default().fg(Color::Gray)),
        Span::raw(play.description.clone().unwrap_or_default()),
    ])
}
