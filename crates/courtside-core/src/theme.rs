// Team colour pairs for headers and badges.

use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamTheme {
    pub primary: &'static str,
    pub text: &'static str,
}

/// Used whenever a team is unknown or missing.
pub const DEFAULT_THEME: TeamTheme = TeamTheme {
    primary: "#1d4ed8",
    text: "#ffffff",
};

const PALETTE: &[(&str, TeamTheme)] = &[
    ("ATL", TeamTheme { primary: "#e03a3e", text: "#ffffff" }),
    ("BOS", TeamTheme { primary: "#007a33", text: "#ffffff" }),
    ("BKN", TeamTheme { primary: "#000000", text: "#ffffff" }),
    ("CHA", TeamTheme { primary: "#1d1160", text: "#00788c" }),
    ("CHI", TeamTheme { primary: "#ce1141", text: "#ffffff" }),
    ("CLE", TeamTheme { primary: "#860038", text: "#fdbb30" }),
    ("DAL", TeamTheme { primary: "#00538c", text: "#ffffff" }),
    ("DEN", TeamTheme { primary: "#0e2240", text: "#fec524" }),
    ("DET", TeamTheme { primary: "#c8102e", text: "#ffffff" }),
    ("GSW", TeamTheme { primary: "#1d428a", text: "#ffc72c" }),
    ("HOU", TeamTheme { primary: "#ce1141", text: "#ffffff" }),
    ("IND", TeamTheme { primary: "#002d62", text: "#fdbb30" }),
    ("LAC", TeamTheme { primary: "#c8102e", text: "#ffffff" }),
    ("LAL", TeamTheme { primary: "#552583", text: "#fdb927" }),
    ("MEM", TeamTheme { primary: "#5d76a9", text: "#ffffff" }),
    ("MIA", TeamTheme { primary: "#98002e", text: "#f9a01b" }),
    ("MIL", TeamTheme { primary: "#00471b", text: "#eee1c6" }),
    ("MIN", TeamTheme { primary: "#0c2340", text: "#78be20" }),
    ("NOP", TeamTheme { primary: "#0c2340", text: "#c8102e" }),
    ("NYK", TeamTheme { primary: "#006bb6", text: "#f58426" }),
    ("OKC", TeamTheme { primary: "#007ac1", text: "#ffffff" }),
    ("ORL", TeamTheme { primary: "#0077c0", text: "#ffffff" }),
    ("PHI", TeamTheme { primary: "#006bb6", text: "#ffffff" }),
    ("PHX", TeamTheme { primary: "#1d1160", text: "#e56020" }),
    ("POR", TeamTheme { primary: "#e03a3e", text: "#ffffff" }),
    ("SAC", TeamTheme { primary: "#5a2d81", text: "#ffffff" }),
    ("SAS", TeamTheme { primary: "#000000", text: "#c4ced4" }),
    ("TOR", TeamTheme { primary: "#ce1141", text: "#ffffff" }),
    ("UTA", TeamTheme { primary: "#002b5c", text: "#f9a01b" }),
    ("WAS", TeamTheme { primary: "#002b5c", text: "#e31837" }),
];

/// Colours for a team abbreviation, case-insensitive.
pub fn team_theme(abbreviation: Option<&str>) -> TeamTheme {
    abbreviation
        .map(str::trim)
        .and_then(|abbr| {
            PALETTE
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(abbr))
                .map(|(_, theme)| *theme)
        })
        .unwrap_or(DEFAULT_THEME)
}

/// Colours for a user's favourite team.
pub fn user_theme(user: Option<&User>) -> TeamTheme {
    team_theme(
        user.and_then(|u| u.favorite_team.as_ref())
            .map(|team| team.abbreviation.as_str()),
    )
}

impl TeamTheme {
    pub fn primary_rgb(&self) -> (u8, u8, u8) {
        parse_hex(self.primary).unwrap_or((0x1d, 0x4e, 0xd8))
    }

    pub fn text_rgb(&self) -> (u8, u8, u8) {
        parse_hex(self.text).unwrap_or((0xff, 0xff, 0xff))
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
