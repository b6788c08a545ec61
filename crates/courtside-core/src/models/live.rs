// Live box-score payload pushed over `/ws/jogos/{id}`. Every frame is a
// complete snapshot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePlayerLine {
    #[serde(default)]
    pub player_id: i64,
    pub player_name: String,
    #[serde(default)]
    pub position: Option<String>,
    /// Clock-style minutes played, e.g. "31:12".
    #[serde(default = "zero_minutes")]
    pub minutes: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub rebounds: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub steals: u32,
    #[serde(default)]
    pub blocks: u32,
}

fn zero_minutes() -> String {
    "00:00".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveTeamLine {
    #[serde(default)]
    pub team_id: i64,
    pub team_name: String,
    #[serde(default)]
    pub team_abbreviation: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub fg_pct: f64,
    #[serde(default)]
    pub fg3_pct: f64,
    #[serde(default)]
    pub ft_pct: f64,
    #[serde(default)]
    pub rebounds: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub turnovers: u32,
    #[serde(default)]
    pub players: Vec<LivePlayerLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayByPlayEvent {
    pub event_num: i64,
    #[serde(default)]
    pub clock: Option<String>,
    pub period: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveBoxScore {
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game_status_text: String,
    #[serde(default)]
    pub period: u32,
    pub home_team: LiveTeamLine,
    pub away_team: LiveTeamLine,
    #[serde(default)]
    pub play_by_play: Vec<PlayByPlayEvent>,
}

impl LiveTeamLine {
    /// Short label for scoreboards; the feed may omit the abbreviation.
    pub fn label(&self) -> &str {
        if self.team_abbreviation.is_empty() {
            &self.team_name
        } else {
            &self.team_abbreviation
        }
    }
}

impl LiveBoxScore {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Most recent play, if the feed includes any.
    pub fn last_play(&self) -> Option<&PlayByPlayEvent> {
        self.play_by_play.iter().max_by_key(|e| e.event_num)
    }
}
