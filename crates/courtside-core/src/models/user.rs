use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::achievement::UnlockedAchievement;
use super::player::Player;
use super::review::ReviewSummary;
use super::team::{Team, TeamSummary};
use super::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserLevel {
    Rookie,
    #[serde(rename = "Role Player")]
    RolePlayer,
    #[serde(rename = "Sixth Man")]
    SixthMan,
    Starter,
    #[serde(rename = "Franchise Player")]
    FranchisePlayer,
    #[serde(rename = "GOAT")]
    Goat,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserLevel::Rookie => "Rookie",
            UserLevel::RolePlayer => "Role Player",
            UserLevel::SixthMan => "Sixth Man",
            UserLevel::Starter => "Starter",
            UserLevel::FranchisePlayer => "Franchise Player",
            UserLevel::Goat => "GOAT",
            UserLevel::Unknown => "?",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "inativo")]
    Inactive,
    #[serde(other)]
    Unknown,
}

/// Author reference embedded in reviews, comments and follower lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(rename = "foto_perfil", default)]
    pub avatar_url: Option<String>,
    #[serde(rename = "nivel_usuario")]
    pub level: UserLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "nome_completo", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "time_favorito_id", default)]
    pub favorite_team_id: Option<i64>,
    #[serde(
        rename = "time_favorito",
        default,
        deserialize_with = "lenient_team"
    )]
    pub favorite_team: Option<TeamSummary>,
    #[serde(rename = "data_cadastro", with = "timestamp")]
    pub joined_at: DateTime<Utc>,
    #[serde(rename = "nivel_usuario")]
    pub level: UserLevel,
    #[serde(rename = "pontos_experiencia", default)]
    pub xp: i64,
    pub status: AccountStatus,
    #[serde(rename = "foto_perfil", default)]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            level: self.level,
        }
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// A malformed favourite team must not reject the whole user payload.
fn lenient_team<'de, D>(deserializer: D) -> Result<Option<TeamSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(raw) {
        Ok(team) => Ok(Some(team)),
        Err(e) => {
            tracing::debug!("ignoring malformed time_favorito: {e}");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "total_avaliacoes", default)]
    pub review_count: u32,
    #[serde(rename = "total_seguidores", default)]
    pub follower_count: u32,
    #[serde(rename = "total_seguindo", default)]
    pub following_count: u32,
    #[serde(rename = "avaliacoes_recentes", default)]
    pub recent_reviews: Vec<ReviewSummary>,
    #[serde(rename = "conquistas_desbloqueadas", default)]
    pub unlocked: Vec<UnlockedAchievement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotedPlayer {
    #[serde(rename = "jogador", default)]
    pub player: Option<Player>,
    #[serde(rename = "votos")]
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    #[serde(rename = "time", default)]
    pub team: Option<Team>,
    #[serde(rename = "total_avaliacoes", default)]
    pub review_count: Option<u32>,
    #[serde(rename = "media_nota", default)]
    pub average: Option<f64>,
    #[serde(rename = "media_ataque", default)]
    pub attack: Option<f64>,
    #[serde(rename = "media_defesa", default)]
    pub defense: Option<f64>,
}

/// Aggregates the server computes over a user's reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(rename = "total_avaliacoes")]
    pub review_count: u32,
    #[serde(rename = "media_geral")]
    pub average_rating: f64,
    /// Score (as the string key sent by the server, e.g. "4.5") to count.
    #[serde(rename = "distribuicao_notas", default)]
    pub distribution: BTreeMap<String, u32>,
    #[serde(rename = "mvp_mais_votado", default)]
    pub top_mvp: Option<VotedPlayer>,
    #[serde(rename = "decepcao_mais_votada", default)]
    pub top_letdown: Option<VotedPlayer>,
    #[serde(rename = "time_mais_avaliado", default)]
    pub most_reviewed_team: Option<TeamRating>,
    #[serde(rename = "time_melhor_avaliado", default)]
    pub best_rated_team: Option<TeamRating>,
    #[serde(rename = "time_pior_avaliado", default)]
    pub worst_rated_team: Option<TeamRating>,
    #[serde(rename = "time_melhor_ataque", default)]
    pub best_attack_team: Option<TeamRating>,
    #[serde(rename = "time_melhor_defesa", default)]
    pub best_defense_team: Option<TeamRating>,
}

/// Entry in a followers/following list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialUser {
    #[serde(flatten)]
    pub user: UserSummary,
    #[serde(rename = "is_followed_by_current_user", default)]
    pub followed_by_me: bool,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Registration body.
#[derive(Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "nome_completo", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "time_favorito_id", skip_serializing_if = "Option::is_none")]
    pub favorite_team_id: Option<i64>,
    #[serde(rename = "foto_perfil", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Partial profile update. Unset fields are left unchanged server-side.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nome_completo", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "time_favorito_id", skip_serializing_if = "Option::is_none")]
    pub favorite_team_id: Option<i64>,
    #[serde(rename = "foto_perfil", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_url: String,
}
