// In-memory backend for view tests. Keeps just enough server state for
// writes to show up in later reads, and records every call by name.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use courtside_api::{
    ApiError, ApiResult, AuthApi, CatalogApi, GameApi, ReviewApi, Session, SocialApi, Upload,
};
use courtside_core::models::{
    AccessToken, Comment, FeaturedGame, FeaturedWindow, FeedReview, Game, GameFilter,
    GameLogEntry, LikeReceipt, NewComment, NewUser, Player, PlayerDetails, ProfileUpdate, Review,
    ReviewDraft, RosterPlayer, Schedule, SearchQuery, SearchResult, SocialUser, Team, TeamDetails,
    UnlockedAchievement, UploadedFile, User, UserProfile, UserStats,
};
use courtside_core::storage::MemoryTokenStore;

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

pub fn from_json<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture must deserialize")
}

pub fn team_json(id: i64, abbreviation: &str) -> Value {
    json!({
        "id": id,
        "nome": format!("Team {abbreviation}"),
        "slug": abbreviation.to_lowercase(),
        "sigla": abbreviation
    })
}

pub fn game_json(id: i64) -> Value {
    json!({
        "id": id,
        "slug": format!("bos-vs-lal-{id}"),
        "data_jogo": "2024-03-01T19:30:00",
        "temporada": "2023-24",
        "status_jogo": "Final",
        "placar_casa": 110,
        "placar_visitante": 104,
        "time_casa": team_json(1, "BOS"),
        "time_visitante": team_json(2, "LAL"),
        "liga_id": 1,
        "time_casa_id": 1,
        "time_visitante_id": 2
    })
}

pub fn game(id: i64) -> Game {
    from_json(game_json(id))
}

pub fn summary_json(id: i64) -> Value {
    json!({"id": id, "username": format!("fan{id}"), "nivel_usuario": "Rookie"})
}

pub fn user_json(id: i64, favorite: Option<&str>) -> Value {
    let mut user = json!({
        "id": id,
        "username": format!("fan{id}"),
        "email": format!("fan{id}@example.com"),
        "data_cadastro": "2024-01-10T12:00:00",
        "nivel_usuario": "Starter",
        "pontos_experiencia": 120,
        "status": "ativo"
    });
    if let Some(abbr) = favorite {
        user["time_favorito"] = team_json(10, abbr);
    }
    user
}

pub fn user(id: i64) -> User {
    from_json(user_json(id, None))
}

pub fn review(id: i64, game_id: i64, author_id: i64, overall: f64) -> Review {
    from_json(json!({
        "id": id,
        "nota_geral": overall,
        "nota_ataque_casa": 4.0,
        "nota_defesa_casa": 3.0,
        "nota_ataque_visitante": 2.5,
        "data_avaliacao": "2024-03-02T10:00:00",
        "curtidas": 0,
        "usuario": summary_json(author_id),
        "jogo": game_json(game_id),
        "curtido_pelo_usuario_atual": false
    }))
}

pub fn feed_review(id: i64, likes: u32, liked: bool) -> FeedReview {
    from_json(json!({
        "id": id,
        "usuario": summary_json(50 + id),
        "jogo": game_json(1),
        "nota_geral": 4.0,
        "data_avaliacao": "2024-03-02T10:00:00",
        "total_curtidas": likes,
        "total_comentarios": 0,
        "ja_curtiu": liked
    }))
}

pub fn featured(id: i64) -> FeaturedGame {
    from_json(json!({
        "id": id,
        "slug": format!("bos-vs-lal-{id}"),
        "data_jogo": "2024-03-01T19:30:00",
        "temporada": "2023-24",
        "placar_casa": 110,
        "placar_visitante": 104,
        "time_casa": team_json(1, "BOS"),
        "time_visitante": team_json(2, "LAL"),
        "total_avaliacoes": 3,
        "media_geral": 4.5,
        "tipo_destaque": "Mais avaliado"
    }))
}

pub fn profile(id: i64, followers: u32) -> UserProfile {
    let mut body = user_json(id, Some("LAL"));
    body["total_avaliacoes"] = json!(2);
    body["total_seguidores"] = json!(followers);
    body["total_seguindo"] = json!(1);
    from_json(body)
}

pub fn stats() -> UserStats {
    from_json(json!({
        "total_avaliacoes": 2,
        "media_geral": 4.25,
        "distribuicao_notas": {"4.0": 1, "4.5": 1}
    }))
}

pub fn social(id: i64) -> SocialUser {
    from_json(summary_json(id))
}

pub fn unlocked(achievement_id: u32, at: &str) -> UnlockedAchievement {
    from_json(json!({
        "data_desbloqueio": at,
        "conquista": {"id": achievement_id, "nome": "x", "descricao": "x", "pontos_experiencia": 10}
    }))
}

pub fn team(id: i64, abbreviation: &str) -> Team {
    let mut body = team_json(id, abbreviation);
    body["liga_id"] = json!(1);
    from_json(body)
}

pub fn player_json(id: i64, name: &str, team_id: i64) -> Value {
    json!({
        "id": id,
        "nome": name,
        "nome_normalizado": name.to_lowercase(),
        "slug": name.to_lowercase().replace(' ', "-"),
        "time_atual_id": team_id
    })
}

pub fn player(id: i64, name: &str) -> Player {
    from_json(player_json(id, name, 1))
}

/// Details with one averages row per season, newest first.
pub fn player_details(id: i64, name: &str, seasons: &[&str]) -> PlayerDetails {
    let mut body = player_json(id, name, 1);
    body["stats_por_temporada"] = seasons
        .iter()
        .map(|season| {
            json!({
                "temporada": season,
                "jogos_disputados": 70,
                "pontos_por_jogo": 25.1,
                "rebotes_por_jogo": 7.3,
                "assistencias_por_jogo": 8.0
            })
        })
        .collect();
    from_json(body)
}

pub fn log_entry(game_id: i64, points: u32) -> GameLogEntry {
    from_json(json!({
        "jogo_id": game_id,
        "data_jogo": "2024-03-01T19:30:00",
        "adversario": team_json(2, "LAL"),
        "pontos": points,
        "rebotes": 5,
        "assistencias": 6
    }))
}

fn roster_player(id: i64) -> RosterPlayer {
    from_json(json!({
        "id": id,
        "nome": format!("Player {id}"),
        "nome_normalizado": format!("player {id}"),
        "slug": format!("player-{id}")
    }))
}

// ---------------------------------------------------------------------------
// FakeBackend
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
    bearer: Mutex<Option<String>>,
    pub me: Mutex<Option<User>>,
    pub games: Mutex<Vec<Game>>,
    pub featured: Mutex<Vec<FeaturedGame>>,
    pub reviews: Mutex<Vec<Review>>,
    pub likes: Mutex<HashMap<i64, LikeReceipt>>,
    pub comments: Mutex<HashMap<i64, Vec<Comment>>>,
    pub feed_for_you: Mutex<Vec<FeedReview>>,
    pub feed_following: Mutex<Vec<FeedReview>>,
    pub profiles: Mutex<HashMap<String, UserProfile>>,
    pub followers: Mutex<HashMap<String, Vec<SocialUser>>>,
    pub unlocked: Mutex<Vec<UnlockedAchievement>>,
    pub trending: Mutex<Vec<Game>>,
    pub teams: Mutex<Vec<Team>>,
    pub players: Mutex<Vec<PlayerDetails>>,
    pub game_log: Mutex<Vec<GameLogEntry>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in_as(user: User) -> Self {
        let fake = Self::default();
        *fake.me.lock().unwrap() = Some(user);
        fake
    }

    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.failing.lock().unwrap().remove(method);
    }

    pub fn delay(&self, method: &'static str, by: Duration) {
        self.delays.lock().unwrap().insert(method, by);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    async fn enter(&self, method: &'static str, arg: impl std::fmt::Display) -> ApiResult<()> {
        self.calls.lock().unwrap().push(format!("{method} {arg}"));
        let delay = self.delays.lock().unwrap().get(method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(method) {
            return Err(ApiError::Status {
                status: 500,
                detail: Some(format!("{method} failed")),
            });
        }
        Ok(())
    }

    fn current(&self) -> ApiResult<User> {
        self.me.lock().unwrap().clone().ok_or(ApiError::Status {
            status: 401,
            detail: Some("Not authenticated".into()),
        })
    }

    fn receipt(&self, review_id: i64) -> LikeReceipt {
        *self
            .likes
            .lock()
            .unwrap()
            .entry(review_id)
            .or_insert(LikeReceipt {
                review_id,
                total_likes: 0,
                liked: false,
            })
    }
}

/// A session hydrated against `api`, logged in when `api.me` is set.
pub async fn session_for(api: &Arc<FakeBackend>) -> Arc<Session> {
    let store = if api.me.lock().unwrap().is_some() {
        MemoryTokenStore::with_token("t")
    } else {
        MemoryTokenStore::default()
    };
    let session = Session::new(api.clone(), Arc::new(store));
    session.hydrate().await.unwrap();
    Arc::new(session)
}

#[async_trait]
impl AuthApi for FakeBackend {
    fn set_bearer(&self, token: Option<String>) {
        *self.bearer.lock().unwrap() = token;
    }

    async fn login(&self, email: &str, _password: &str) -> ApiResult<AccessToken> {
        self.enter("login", email).await?;
        Ok(AccessToken {
            access_token: "t".into(),
            token_type: "bearer".into(),
        })
    }

    async fn register(&self, new_user: &NewUser) -> ApiResult<User> {
        self.enter("register", &new_user.username).await?;
        self.current()
    }

    async fn me(&self) -> ApiResult<User> {
        self.enter("me", "").await?;
        self.current()
    }

    async fn update_me(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.enter("update_me", "").await?;
        let mut me = self.me.lock().unwrap();
        let user = me.as_mut().ok_or(ApiError::Status {
            status: 401,
            detail: None,
        })?;
        if update.full_name.is_some() {
            user.full_name = update.full_name.clone();
        }
        if update.bio.is_some() {
            user.bio = update.bio.clone();
        }
        if update.avatar_url.is_some() {
            user.avatar_url = update.avatar_url.clone();
        }
        if update.favorite_team_id.is_some() {
            user.favorite_team_id = update.favorite_team_id;
        }
        let updated = user.clone();
        drop(me);
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&updated.username) {
            profile.user = updated.clone();
        }
        Ok(updated)
    }

    async fn upload_profile_picture(&self, upload: Upload) -> ApiResult<UploadedFile> {
        self.enter("upload_profile_picture", &upload.file_name).await?;
        Ok(UploadedFile {
            file_url: format!("/static/profile_pics/{}", upload.file_name),
        })
    }
}

#[async_trait]
impl GameApi for FakeBackend {
    async fn game(&self, id: i64) -> ApiResult<Game> {
        self.enter("game", id).await?;
        self.games
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                detail: Some("Jogo não encontrado".into()),
            })
    }

    async fn game_by_slug(&self, slug: &str) -> ApiResult<Game> {
        self.enter("game_by_slug", slug).await?;
        self.games
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.slug.as_deref() == Some(slug))
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                detail: Some("Jogo não encontrado".into()),
            })
    }

    async fn games(&self, filter: &GameFilter) -> ApiResult<Vec<Game>> {
        let query = serde_json::to_string(filter).unwrap_or_default();
        self.enter("games", query).await?;
        Ok(self
            .games
            .lock()
            .unwrap()
            .iter()
            .filter(|g| {
                filter
                    .team_id
                    .map_or(true, |id| g.home_team_id == id || g.away_team_id == id)
            })
            .filter(|g| filter.date.map_or(true, |d| g.tip_off.date_naive() == d))
            .cloned()
            .collect())
    }

    async fn upcoming_games(&self) -> ApiResult<Vec<Game>> {
        self.enter("upcoming_games", "").await?;
        Ok(self.games.lock().unwrap().clone())
    }

    async fn trending_games(&self) -> ApiResult<Vec<Game>> {
        self.enter("trending_games", "").await?;
        Ok(self.trending.lock().unwrap().clone())
    }

    async fn featured_games(
        &self,
        window: FeaturedWindow,
        limit: u32,
    ) -> ApiResult<Vec<FeaturedGame>> {
        self.enter("featured_games", window.as_query()).await?;
        Ok(self
            .featured
            .lock()
            .unwrap()
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogApi for FakeBackend {
    async fn teams(&self) -> ApiResult<Vec<Team>> {
        self.enter("teams", "").await?;
        Ok(self.teams.lock().unwrap().clone())
    }

    async fn team_details(&self, slug: &str) -> ApiResult<TeamDetails> {
        self.enter("team_details", slug).await?;
        self.teams
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.slug.as_deref() == Some(slug))
            .map(|team| TeamDetails {
                team: team.clone(),
                titles: Vec::new(),
            })
            .ok_or(ApiError::Status {
                status: 404,
                detail: Some("Time não encontrado".into()),
            })
    }

    async fn team_roster(&self, slug: &str) -> ApiResult<Vec<RosterPlayer>> {
        self.enter("team_roster", slug).await?;
        let base = if slug == "bos" { 100 } else { 200 };
        Ok((1..=3).map(|n| roster_player(base + n)).collect())
    }

    async fn team_schedule(&self, slug: &str) -> ApiResult<Schedule> {
        self.enter("team_schedule", slug).await?;
        let (recent, upcoming) = self
            .games
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.home_team.slug == slug || g.away_team.slug == slug)
            .cloned()
            .partition(|g| g.status == "Final");
        Ok(Schedule { recent, upcoming })
    }

    async fn players(&self, limit: u32) -> ApiResult<Vec<Player>> {
        self.enter("players", limit).await?;
        Ok(self
            .players
            .lock()
            .unwrap()
            .iter()
            .take(limit as usize)
            .map(|d| d.player.clone())
            .collect())
    }

    async fn player_details(&self, slug: &str) -> ApiResult<PlayerDetails> {
        self.enter("player_details", slug).await?;
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.player.slug == slug)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                detail: Some("Jogador não encontrado".into()),
            })
    }

    async fn player_game_log(&self, slug: &str, season: &str) -> ApiResult<Vec<GameLogEntry>> {
        self.enter("player_game_log", format!("{slug} {season}")).await?;
        Ok(self.game_log.lock().unwrap().clone())
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<SearchResult>> {
        let text = serde_json::to_string(query).unwrap_or_default();
        self.enter("search", text).await?;
        let contains = |haystack: &str, needle: &Option<String>| {
            needle
                .as_ref()
                .is_some_and(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        };
        let mut hits: Vec<SearchResult> = self
            .players
            .lock()
            .unwrap()
            .iter()
            .filter(|d| contains(&d.player.name, &query.player_name))
            .map(|d| SearchResult::Player(Box::new(d.player.clone())))
            .collect();
        hits.extend(
            self.teams
                .lock()
                .unwrap()
                .iter()
                .filter(|t| {
                    contains(&t.name, &query.team_name)
                        || contains(&t.abbreviation, &query.team_abbreviation)
                })
                .cloned()
                .map(SearchResult::Team),
        );
        Ok(hits)
    }
}

#[async_trait]
impl ReviewApi for FakeBackend {
    async fn game_reviews(&self, game_id: i64) -> ApiResult<Vec<Review>> {
        self.enter("game_reviews", game_id).await?;
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.game.id == game_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, game_id: i64, draft: &ReviewDraft) -> ApiResult<Review> {
        self.enter("create_review", game_id).await?;
        let author = self.current()?;
        let mut reviews = self.reviews.lock().unwrap();
        let id = reviews.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let mut created = review(id, game_id, author.id, draft.scores.overall);
        created.scores = draft.scores.clone();
        created.text = draft.text.clone();
        created.best_player_id = draft.best_player_id;
        created.worst_player_id = draft.worst_player_id;
        created.author = author.summary();
        reviews.push(created.clone());
        Ok(created)
    }

    async fn update_review(&self, review_id: i64, draft: &ReviewDraft) -> ApiResult<Review> {
        self.enter("update_review", review_id).await?;
        let mut reviews = self.reviews.lock().unwrap();
        let existing = reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or(ApiError::Status {
                status: 404,
                detail: None,
            })?;
        existing.scores = draft.scores.clone();
        existing.text = draft.text.clone();
        existing.best_player_id = draft.best_player_id;
        existing.worst_player_id = draft.worst_player_id;
        Ok(existing.clone())
    }

    async fn delete_review(&self, review_id: i64) -> ApiResult<()> {
        self.enter("delete_review", review_id).await?;
        self.reviews.lock().unwrap().retain(|r| r.id != review_id);
        Ok(())
    }

    async fn like_review(&self, review_id: i64) -> ApiResult<LikeReceipt> {
        self.enter("like_review", review_id).await?;
        let mut receipt = self.receipt(review_id);
        if !receipt.liked {
            receipt.liked = true;
            receipt.total_likes += 1;
        }
        self.likes.lock().unwrap().insert(review_id, receipt);
        Ok(receipt)
    }

    async fn unlike_review(&self, review_id: i64) -> ApiResult<LikeReceipt> {
        self.enter("unlike_review", review_id).await?;
        let mut receipt = self.receipt(review_id);
        if receipt.liked {
            receipt.liked = false;
            receipt.total_likes = receipt.total_likes.saturating_sub(1);
        }
        self.likes.lock().unwrap().insert(review_id, receipt);
        Ok(receipt)
    }

    async fn comments(&self, review_id: i64) -> ApiResult<Vec<Comment>> {
        self.enter("comments", review_id).await?;
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&review_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn post_comment(&self, review_id: i64, comment: &NewComment) -> ApiResult<Comment> {
        self.enter("post_comment", review_id).await?;
        let author = self.current()?;
        let mut all = self.comments.lock().unwrap();
        let thread = all.entry(review_id).or_default();
        let created: Comment = from_json(json!({
            "id": thread.len() as i64 + 1,
            "comentario": comment.text,
            "resposta_para_id": comment.reply_to,
            "data_comentario": "2024-03-03T08:00:00",
            "usuario": summary_json(author.id)
        }));
        thread.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl SocialApi for FakeBackend {
    async fn profile(&self, username: &str) -> ApiResult<UserProfile> {
        self.enter("profile", username).await?;
        self.profiles
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                detail: Some("Usuário não encontrado".into()),
            })
    }

    async fn user_stats(&self, username: &str) -> ApiResult<UserStats> {
        self.enter("user_stats", username).await?;
        Ok(stats())
    }

    async fn followers(&self, username: &str) -> ApiResult<Vec<SocialUser>> {
        self.enter("followers", username).await?;
        Ok(self
            .followers
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    async fn following(&self, username: &str) -> ApiResult<Vec<SocialUser>> {
        self.enter("following", username).await?;
        Ok(Vec::new())
    }

    async fn follow(&self, user_id: i64) -> ApiResult<()> {
        self.enter("follow", user_id).await?;
        let me = self.current()?;
        let username = format!("fan{user_id}");
        self.followers
            .lock()
            .unwrap()
            .entry(username.clone())
            .or_default()
            .push(social(me.id));
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&username) {
            profile.follower_count += 1;
        }
        Ok(())
    }

    async fn unfollow(&self, user_id: i64) -> ApiResult<()> {
        self.enter("unfollow", user_id).await?;
        let me = self.current()?;
        let username = format!("fan{user_id}");
        if let Some(list) = self.followers.lock().unwrap().get_mut(&username) {
            list.retain(|f| f.user.id != me.id);
        }
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&username) {
            profile.follower_count = profile.follower_count.saturating_sub(1);
        }
        Ok(())
    }

    async fn achievements(&self, user_id: i64) -> ApiResult<Vec<UnlockedAchievement>> {
        self.enter("achievements", user_id).await?;
        Ok(self.unlocked.lock().unwrap().clone())
    }

    async fn feed_for_you(&self) -> ApiResult<Vec<FeedReview>> {
        self.enter("feed_for_you", "").await?;
        Ok(self.feed_for_you.lock().unwrap().clone())
    }

    async fn feed_following(&self) -> ApiResult<Vec<FeedReview>> {
        self.enter("feed_following", "").await?;
        Ok(self.feed_following.lock().unwrap().clone())
    }
}
