// One team's box score table.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use courtside_core::models::{LivePlayerLine, LiveTeamLine};

use crate::palette::team_style;

pub fn render(frame: &mut Frame, area: Rect, team: Option<&LiveTeamLine>) {
    let Some(team) = team else {
        let block = Block::default().borders(Borders::ALL).title("Box score");
        frame.render_widget(block, area);
        return;
    };

    let header = Row::new(["Player", "MIN", "PTS", "REB", "AST", "STL", "BLK"])
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = if team.players.is_empty() {
        vec![Row::new(vec![Cell::from("  No player lines yet")])]
    } else {
        sorted_lines(team).into_iter().map(player_row).collect()
    };

    let widths = [
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
    ];

    let title = Line::from(vec![
        Span::styled(format!(" {} ", team.label()), team_style(team.label())),
        Span::raw(format!(" {}  {}", team.team_name, shooting_summary(team))),
    ]);
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

/// Highest scorers first; ties keep feed order.
pub fn sorted_lines(team: &LiveTeamLine) -> Vec<&LivePlayerLine> {
    let mut lines: Vec<&LivePlayerLine> = team.players.iter().collect();
    lines.sort_by(|a, b| b.points.cmp(&a.points));
    lines
}

fn player_row(line: &LivePlayerLine) -> Row<'static> {
    Row::new(vec![
        Cell::from(line.player_name.clone()),
        Cell::from(line.minutes.clone()),
        Cell::from(line.points.to_string()),
        Cell::from(line.rebounds.to_string()),
        Cell::from(line.assists.to_string()),
        Cell::from(line.steals.to_string()),
        Cell::from(line.blocks.to_string()),
    ])
}

/// Percentages arrive either as fractions (0.512) or already scaled (51.2).
pub fn format_pct(value: f64) -> String {
    let pct = if value <= 1.0 { value * 100.0 } else { value };
    format!("{pct:.1}%")
}

pub fn shooting_summary(team: &LiveTeamLine) -> String {
    format!(
        "FG {}  3P {}  FT {}",
        format_pct(team.fg_pct),
        format_pct(team.fg3_pct),
        format_pct(team.ft_pct)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_view::widgets::scoreboard::tests::snapshot;

    #[test]
    fn percentages_accept_both_scales() {
        assert_eq!(format_pct(0.512), "51.2%");
        assert_eq!(format_pct(51.2), "51.2%");
        assert_eq!(format_pct(0.0), "0.0%");
    }

    #[test]
    fn leading_scorer_first() {
        let snap = snapshot();
        let names: Vec<&str> = sorted_lines(&snap.home_team)
            .iter()
            .map(|l| l.player_name.as_str())
            .collect();
        assert_eq!(names, vec!["J. Tatum", "J. Brown"]);
        assert_eq!(shooting_summary(&snap.home_team), "FG 51.2%  3P 38.0%  FT 90.0%");
    }

    #[test]
    fn render_lists_players() {
        let backend = ratatui::backend::TestBackend::new(60, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let snap = snapshot();
        terminal
            .draw(|frame| render(frame, frame.area(), Some(&snap.home_team)))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..8u16)
            .flat_map(|y| (0..60u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(text.contains("J. Tatum"));
        assert!(text.contains("36:02"));
    }

    #[test]
    fn render_without_team_draws_empty_frame() {
        let backend = ratatui::backend::TestBackend::new(30, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), None))
            .unwrap();
    }
}
