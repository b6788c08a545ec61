// Status bar: connection state, game id, frame counters.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use courtside_live::{LiveBoard, LiveStatus};

pub fn render(frame: &mut Frame, area: Rect, board: &LiveBoard, game_id: i64) {
    let (label, color) = status_indicator(&board.status);
    let mut spans = vec![
        Span::styled(" ● ", Style::default().fg(color)),
        Span::styled(label, Style::default().fg(Color::White)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(format!("Game {game_id}"), Style::default().fg(Color::White)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} updates", board.frames_received),
            Style::default().fg(Color::White),
        ),
    ];
    if board.malformed_frames > 0 {
        spans.push(Span::styled(
            format!(" ({} skipped)", board.malformed_frames),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Label and dot colour for a connection status.
pub fn status_indicator(status: &LiveStatus) -> (String, Color) {
    match status {
        LiveStatus::Connecting => ("Connecting".to_string(), Color::Yellow),
        LiveStatus::Connected => ("Live".to_string(), Color::Green),
        LiveStatus::Reconnecting { attempt, delay } => (
            format!("Reconnecting (attempt {attempt}, {}ms)", delay.as_millis()),
            Color::Yellow,
        ),
        LiveStatus::Disconnected => ("Disconnected".to_string(), Color::Gray),
        LiveStatus::Errored(reason) => (format!("Error: {reason}"), Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn indicator_per_status() {
        assert_eq!(status_indicator(&LiveStatus::Connected).1, Color::Green);
        assert_eq!(
            status_indicator(&LiveStatus::Reconnecting {
                attempt: 2,
                delay: Duration::from_millis(1000)
            })
            .0,
            "Reconnecting (attempt 2, 1000ms)"
        );
        let (label, color) = status_indicator(&LiveStatus::Errored("refused".into()));
        assert_eq!(label, "Error: refused");
        assert_eq!(color, Color::Red);
    }

    #[test]
    fn render_shows_skipped_frames() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut board = LiveBoard::new();
        board.status = LiveStatus::Connected;
        board.frames_received = 12;
        board.malformed_frames = 1;
        terminal
            .draw(|frame| render(frame, frame.area(), &board, 42))
            .unwrap();

        let line: String = (0..80u16)
            .map(|x| terminal.backend().buffer()[(x, 0u16)].symbol().to_string())
            .collect();
        assert!(line.contains("Live"));
        assert!(line.contains("Game 42"));
        assert!(line.contains("12 updates (1 skipped)"));
    }
}
