use serde::{Deserialize, Serialize};

use super::game::Game;

/// Compact team reference embedded in games, players and users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub slug: String,
    #[serde(rename = "sigla")]
    pub abbreviation: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    #[serde(default)]
    pub api_id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "sigla")]
    pub abbreviation: String,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(rename = "liga_id")]
    pub league_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTitle {
    #[serde(rename = "nome_conquista")]
    pub title: String,
    #[serde(rename = "temporada")]
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDetails {
    #[serde(flatten)]
    pub team: Team,
    #[serde(rename = "conquistas", default)]
    pub titles: Vec<TeamTitle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nome_normalizado")]
    pub normalized_name: String,
    pub slug: String,
    #[serde(rename = "numero_camisa", default)]
    pub jersey_number: Option<u32>,
    #[serde(rename = "posicao", default)]
    pub position: Option<String>,
    #[serde(rename = "foto_url", default)]
    pub photo_url: Option<String>,
}

/// A team's recent results and upcoming fixtures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub recent: Vec<Game>,
    pub upcoming: Vec<Game>,
}
