use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::team::TeamSummary;
use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    #[serde(default)]
    pub api_id: Option<i64>,
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
    #[serde(rename = "time_atual_id")]
    pub team_id: i64,
    #[serde(rename = "time_atual", default)]
    pub team: Option<TeamSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAward {
    #[serde(rename = "nome_conquista")]
    pub title: String,
    #[serde(rename = "temporada")]
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonAverages {
    #[serde(rename = "temporada")]
    pub season: String,
    #[serde(rename = "jogos_disputados")]
    pub games_played: u32,
    #[serde(rename = "pontos_por_jogo")]
    pub points: f64,
    #[serde(rename = "rebotes_por_jogo")]
    pub rebounds: f64,
    #[serde(rename = "assistencias_por_jogo")]
    pub assists: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetails {
    #[serde(flatten)]
    pub player: Player,
    #[serde(rename = "data_nascimento", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "ano_draft", default)]
    pub draft_year: Option<i32>,
    #[serde(rename = "anos_experiencia", default)]
    pub years_experience: Option<u32>,
    #[serde(rename = "altura", default)]
    pub height_cm: Option<u32>,
    #[serde(rename = "peso", default)]
    pub weight_kg: Option<f64>,
    #[serde(rename = "nacionalidade", default)]
    pub nationality: Option<String>,
    #[serde(rename = "idade", default)]
    pub age: Option<u32>,
    #[serde(rename = "conquistas", default)]
    pub awards: Vec<PlayerAward>,
    #[serde(rename = "stats_por_temporada", default)]
    pub season_stats: Vec<SeasonAverages>,
}

/// One line of a player's per-game log for a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLogEntry {
    #[serde(rename = "jogo_id")]
    pub game_id: i64,
    #[serde(rename = "data_jogo", with = "timestamp")]
    pub played_at: DateTime<Utc>,
    #[serde(rename = "adversario")]
    pub opponent: TeamSummary,
    #[serde(rename = "pontos")]
    pub points: u32,
    #[serde(rename = "rebotes")]
    pub rebounds: u32,
    #[serde(rename = "assistencias")]
    pub assists: u32,
}
