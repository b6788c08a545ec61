// Team colours as terminal styles.

use ratatui::style::{Color, Modifier, Style};

use courtside_core::theme::{team_theme, TeamTheme};

/// Parse `#rrggbb` into an RGB colour.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Header style for a team: its text colour on its primary colour.
pub fn theme_style(theme: TeamTheme) -> Style {
    Style::default()
        .fg(hex_color(theme.text).unwrap_or(Color::White))
        .bg(hex_color(theme.primary).unwrap_or(Color::Blue))
        .add_modifier(Modifier::BOLD)
}

pub fn team_style(abbreviation: &str) -> Style {
    theme_style(team_theme(Some(abbreviation)))
}
