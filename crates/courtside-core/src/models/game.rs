use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::team::{Team, TeamSummary};
use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub api_id: Option<i64>,
    #[serde(rename = "data_jogo", with = "timestamp")]
    pub tip_off: DateTime<Utc>,
    #[serde(rename = "temporada")]
    pub season: String,
    #[serde(rename = "status_jogo")]
    pub status: String,
    #[serde(rename = "placar_casa")]
    pub home_score: i32,
    #[serde(rename = "placar_visitante")]
    pub away_score: i32,
    #[serde(rename = "time_casa")]
    pub home_team: TeamSummary,
    #[serde(rename = "time_visitante")]
    pub away_team: TeamSummary,
    #[serde(default)]
    pub arena: Option<String>,
    #[serde(rename = "liga_id")]
    pub league_id: i64,
    #[serde(rename = "time_casa_id")]
    pub home_team_id: i64,
    #[serde(rename = "time_visitante_id")]
    pub away_team_id: i64,
}

impl Game {
    /// "AWY @ HOM" label used in listings.
    pub fn matchup(&self) -> String {
        format!(
            "{} @ {}",
            self.away_team.abbreviation, self.home_team.abbreviation
        )
    }
}

/// A game picked for the landing page, with its review aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedGame {
    pub id: i64,
    pub slug: String,
    #[serde(rename = "data_jogo", with = "timestamp")]
    pub tip_off: DateTime<Utc>,
    #[serde(rename = "temporada")]
    pub season: String,
    #[serde(rename = "placar_casa")]
    pub home_score: i32,
    #[serde(rename = "placar_visitante")]
    pub away_score: i32,
    #[serde(rename = "time_casa")]
    pub home_team: TeamSummary,
    #[serde(rename = "time_visitante")]
    pub away_team: TeamSummary,
    #[serde(rename = "total_avaliacoes", default)]
    pub review_count: u32,
    #[serde(rename = "media_geral", default)]
    pub average_rating: f64,
    #[serde(rename = "tipo_destaque")]
    pub highlight: String,
}

/// Time window for featured games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeaturedWindow {
    #[default]
    ThisWeek,
    LastThreeDays,
    Yesterday,
}

impl FeaturedWindow {
    pub fn as_query(self) -> &'static str {
        match self {
            FeaturedWindow::ThisWeek => "esta_semana",
            FeaturedWindow::LastThreeDays => "ultimos_3_dias",
            FeaturedWindow::Yesterday => "ontem",
        }
    }
}

/// Query for `GET /jogos`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameFilter {
    #[serde(rename = "time_id", skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Query for `GET /search/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchQuery {
    #[serde(rename = "nome_jogador", skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(rename = "pontos_min", skip_serializing_if = "Option::is_none")]
    pub min_points: Option<u32>,
    #[serde(rename = "temporada", skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(rename = "nome_time", skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(rename = "abreviacao_time", skip_serializing_if = "Option::is_none")]
    pub team_abbreviation: Option<String>,
}

/// Search hits are untyped on the wire; variants are tried most specific first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResult {
    Game(Box<Game>),
    Player(Box<Player>),
    Team(Team),
}
