use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::Game;
use super::timestamp;
use super::user::UserSummary;

/// Ratings attached to a review. Every score is 0.5 to 5.0 in half steps;
/// only `overall` is required.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "nota_geral")]
    pub overall: f64,
    #[serde(rename = "nota_ataque_casa", default)]
    pub home_attack: Option<f64>,
    #[serde(rename = "nota_defesa_casa", default)]
    pub home_defense: Option<f64>,
    #[serde(rename = "nota_ataque_visitante", default)]
    pub away_attack: Option<f64>,
    #[serde(rename = "nota_defesa_visitante", default)]
    pub away_defense: Option<f64>,
    #[serde(rename = "nota_arbitragem", default)]
    pub officiating: Option<f64>,
    #[serde(rename = "nota_atmosfera", default)]
    pub atmosphere: Option<f64>,
}

impl Scores {
    /// Named view over every score, required one first.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("overall", Some(self.overall)),
            ("home_attack", self.home_attack),
            ("home_defense", self.home_defense),
            ("away_attack", self.away_attack),
            ("away_defense", self.away_defense),
            ("officiating", self.officiating),
            ("atmosphere", self.atmosphere),
        ]
    }
}

/// Body for creating or editing a review.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewDraft {
    #[serde(flatten)]
    pub scores: Scores,
    #[serde(rename = "resenha", default)]
    pub text: Option<String>,
    #[serde(rename = "melhor_jogador_id", default)]
    pub best_player_id: Option<i64>,
    #[serde(rename = "pior_jogador_id", default)]
    pub worst_player_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    #[serde(flatten)]
    pub scores: Scores,
    #[serde(rename = "resenha", default)]
    pub text: Option<String>,
    #[serde(rename = "melhor_jogador_id", default)]
    pub best_player_id: Option<i64>,
    #[serde(rename = "pior_jogador_id", default)]
    pub worst_player_id: Option<i64>,
    #[serde(rename = "data_avaliacao", with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "curtidas")]
    pub likes: u32,
    #[serde(rename = "usuario")]
    pub author: UserSummary,
    #[serde(rename = "jogo")]
    pub game: Game,
    #[serde(rename = "curtido_pelo_usuario_atual", default)]
    pub liked_by_me: bool,
}

impl Review {
    /// Draft pre-filled from this review, for editing.
    pub fn to_draft(&self) -> ReviewDraft {
        ReviewDraft {
            scores: self.scores.clone(),
            text: self.text.clone(),
            best_player_id: self.best_player_id,
            worst_player_id: self.worst_player_id,
        }
    }
}

/// Compact review listed on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub id: i64,
    #[serde(rename = "jogo")]
    pub game: Game,
    #[serde(rename = "nota_geral")]
    pub overall: f64,
    #[serde(rename = "resenha", default)]
    pub text: Option<String>,
    #[serde(rename = "data_avaliacao", with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Review as it appears in the "for you" and "following" feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedReview {
    pub id: i64,
    #[serde(rename = "usuario")]
    pub author: UserSummary,
    #[serde(rename = "jogo")]
    pub game: Game,
    #[serde(rename = "nota_geral")]
    pub overall: f64,
    #[serde(rename = "resenha", default)]
    pub text: Option<String>,
    #[serde(rename = "data_avaliacao", with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "total_curtidas", default)]
    pub likes: u32,
    #[serde(rename = "total_comentarios", default)]
    pub comments: u32,
    #[serde(rename = "ja_curtiu", default)]
    pub liked_by_me: bool,
}

/// Authoritative like state returned by the like/unlike endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeReceipt {
    #[serde(rename = "avaliacao_id")]
    pub review_id: i64,
    #[serde(rename = "total_curtidas")]
    pub total_likes: u32,
    #[serde(rename = "curtido")]
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "comentario")]
    pub text: String,
    #[serde(rename = "resposta_para_id", default)]
    pub reply_to: Option<i64>,
    #[serde(rename = "data_comentario", with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "curtidas", default)]
    pub likes: u32,
    #[serde(rename = "usuario")]
    pub author: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    #[serde(rename = "comentario")]
    pub text: String,
    #[serde(rename = "resposta_para_id", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{game_json, user_summary_json};
    use serde_json::json;

    #[test]
    fn review_decodes_flattened_scores() {
        let raw = json!({
            "id": 5,
            "nota_geral": 4.5,
            "nota_ataque_casa": 4,
            "nota_arbitragem": null,
            "resenha": "great fourth quarter",
            "data_avaliacao": "2024-03-02T10:00:00",
            "curtidas": 3,
            "usuario": user_summary_json(9),
            "jogo": game_json(1)
        });
        let review: Review = serde_json::from_value(raw).unwrap();
        assert_eq!(review.scores.overall, 4.5);
        assert_eq!(review.scores.home_attack, Some(4.0));
        assert_eq!(review.scores.officiating, None);
        assert_eq!(review.likes, 3);
        assert!(!review.liked_by_me);
        assert_eq!(review.to_draft().text.as_deref(), Some("great fourth quarter"));
    }

    #[test]
    fn draft_serializes_wire_names() {
        let draft = ReviewDraft {
            scores: Scores {
                overall: 4.5,
                ..Scores::default()
            },
            text: Some("tight game".into()),
            best_player_id: Some(23),
            worst_player_id: None,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["nota_geral"], json!(4.5));
        assert_eq!(value["resenha"], json!("tight game"));
        assert_eq!(value["melhor_jogador_id"], json!(23));
    }

    #[test]
    fn new_comment_omits_missing_parent() {
        let body = NewComment {
            text: "agreed".into(),
            reply_to: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"comentario": "agreed"})
        );
    }
}
