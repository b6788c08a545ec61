use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "icone_url", default)]
    pub icon_url: Option<String>,
    #[serde(rename = "pontos_experiencia")]
    pub xp: u32,
}

/// An achievement the server reports as unlocked. The nested achievement can
/// be missing when the relation failed to load server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    #[serde(rename = "data_desbloqueio", with = "timestamp")]
    pub unlocked_at: DateTime<Utc>,
    #[serde(rename = "conquista", default)]
    pub achievement: Option<Achievement>,
}
