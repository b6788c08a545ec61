// Live screen layout.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Scoreboard (4 rows)                               |
// +-------------------------+------------------------+
// | Away box score (50%)     | Home box score (50%)   |
// +-------------------------+------------------------+
// | Plays (5 rows)                                    |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone)]
pub struct LiveLayout {
    pub status_bar: Rect,
    pub scoreboard: Rect,
    pub away_box: Rect,
    pub home_box: Rect,
    pub plays: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> LiveLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(4), // scoreboard
            Constraint::Min(6),    // box scores
            Constraint::Length(5), // plays
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical[2]);

    LiveLayout {
        status_bar: vertical[0],
        scoreboard: vertical[1],
        away_box: boxes[0],
        home_box: boxes[1],
        plays: vertical[3],
        help_bar: vertical[4],
    }
}
