// Typed endpoint traits and their HTTP implementation.
//
// Views depend on the traits, not on `ApiClient`, so they can be driven by
// in-memory fakes in tests.

use async_trait::async_trait;

use courtside_core::models::{
    AccessToken, Comment, FeaturedGame, FeaturedWindow, FeedReview, Game, GameFilter,
    GameLogEntry, LikeReceipt, NewComment, NewUser, Player, PlayerDetails, ProfileUpdate, Review,
    ReviewDraft, RosterPlayer, Schedule, SearchQuery, SearchResult, SocialUser, Team, TeamDetails,
    UnlockedAchievement, UploadedFile, User, UserProfile, UserStats,
};

use crate::error::ApiError;
use crate::gateway::{segment, Gateway, Upload};

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Set or clear the bearer token attached to later requests.
    fn set_bearer(&self, token: Option<String>);
    async fn login(&self, email: &str, password: &str) -> ApiResult<AccessToken>;
    async fn register(&self, user: &NewUser) -> ApiResult<User>;
    async fn me(&self) -> ApiResult<User>;
    async fn update_me(&self, update: &ProfileUpdate) -> ApiResult<User>;
    async fn upload_profile_picture(&self, upload: Upload) -> ApiResult<UploadedFile>;
}

#[async_trait]
pub trait GameApi: Send + Sync {
    async fn game(&self, id: i64) -> ApiResult<Game>;
    async fn game_by_slug(&self, slug: &str) -> ApiResult<Game>;
    async fn games(&self, filter: &GameFilter) -> ApiResult<Vec<Game>>;
    async fn upcoming_games(&self) -> ApiResult<Vec<Game>>;
    async fn trending_games(&self) -> ApiResult<Vec<Game>>;
    async fn featured_games(
        &self,
        window: FeaturedWindow,
        limit: u32,
    ) -> ApiResult<Vec<FeaturedGame>>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn teams(&self) -> ApiResult<Vec<Team>>;
    async fn team_details(&self, slug: &str) -> ApiResult<TeamDetails>;
    async fn team_roster(&self, slug: &str) -> ApiResult<Vec<RosterPlayer>>;
    async fn team_schedule(&self, slug: &str) -> ApiResult<Schedule>;
    async fn players(&self, limit: u32) -> ApiResult<Vec<Player>>;
    async fn player_details(&self, slug: &str) -> ApiResult<PlayerDetails>;
    async fn player_game_log(&self, slug: &str, season: &str) -> ApiResult<Vec<GameLogEntry>>;
    async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<SearchResult>>;
}

#[async_trait]
pub trait ReviewApi: Send + Sync {
    async fn game_reviews(&self, game_id: i64) -> ApiResult<Vec<Review>>;
    async fn create_review(&self, game_id: i64, draft: &ReviewDraft) -> ApiResult<Review>;
    async fn update_review(&self, review_id: i64, draft: &ReviewDraft) -> ApiResult<Review>;
    async fn delete_review(&self, review_id: i64) -> ApiResult<()>;
    async fn like_review(&self, review_id: i64) -> ApiResult<LikeReceipt>;
    async fn unlike_review(&self, review_id: i64) -> ApiResult<LikeReceipt>;
    async fn comments(&self, review_id: i64) -> ApiResult<Vec<Comment>>;
    async fn post_comment(&self, review_id: i64, comment: &NewComment) -> ApiResult<Comment>;
}

#[async_trait]
pub trait SocialApi: Send + Sync {
    async fn profile(&self, username: &str) -> ApiResult<UserProfile>;
    async fn user_stats(&self, username: &str) -> ApiResult<UserStats>;
    async fn followers(&self, username: &str) -> ApiResult<Vec<SocialUser>>;
    async fn following(&self, username: &str) -> ApiResult<Vec<SocialUser>>;
    async fn follow(&self, user_id: i64) -> ApiResult<()>;
    async fn unfollow(&self, user_id: i64) -> ApiResult<()>;
    async fn achievements(&self, user_id: i64) -> ApiResult<Vec<UnlockedAchievement>>;
    async fn feed_for_you(&self) -> ApiResult<Vec<FeedReview>>;
    async fn feed_following(&self) -> ApiResult<Vec<FeedReview>>;
}

/// Everything the service offers.
pub trait Backend: AuthApi + GameApi + CatalogApi + ReviewApi + SocialApi {}

impl<T> Backend for T where T: AuthApi + GameApi + CatalogApi + ReviewApi + SocialApi {}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiClient {
    gateway: Gateway,
}

impl ApiClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    fn set_bearer(&self, token: Option<String>) {
        self.gateway.set_token(token);
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<AccessToken> {
        self.gateway
            .post_form("/usuarios/login", &[("username", email), ("password", password)])
            .await
    }

    async fn register(&self, user: &NewUser) -> ApiResult<User> {
        self.gateway.post("/usuarios/", user).await
    }

    async fn me(&self) -> ApiResult<User> {
        self.gateway.get("/usuarios/me").await
    }

    async fn update_me(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.gateway.put("/usuarios/me", update).await
    }

    async fn upload_profile_picture(&self, upload: Upload) -> ApiResult<UploadedFile> {
        self.gateway.upload("/upload/profile-picture", upload).await
    }
}

#[async_trait]
impl GameApi for ApiClient {
    async fn game(&self, id: i64) -> ApiResult<Game> {
        self.gateway.get(&format!("/jogos/{id}")).await
    }

    async fn game_by_slug(&self, slug: &str) -> ApiResult<Game> {
        self.gateway
            .get(&format!("/jogos/slug/{}", segment(slug)))
            .await
    }

    async fn games(&self, filter: &GameFilter) -> ApiResult<Vec<Game>> {
        self.gateway.get_query("/jogos/", filter).await
    }

    async fn upcoming_games(&self) -> ApiResult<Vec<Game>> {
        self.gateway.get("/jogos/upcoming").await
    }

    async fn trending_games(&self) -> ApiResult<Vec<Game>> {
        self.gateway.get("/jogos/trending").await
    }

    async fn featured_games(
        &self,
        window: FeaturedWindow,
        limit: u32,
    ) -> ApiResult<Vec<FeaturedGame>> {
        let limit = limit.to_string();
        self.gateway
            .get_query(
                "/jogos/destaque",
                &[("tipo", window.as_query()), ("limit", limit.as_str())],
            )
            .await
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn teams(&self) -> ApiResult<Vec<Team>> {
        self.gateway.get("/times/").await
    }

    async fn team_details(&self, slug: &str) -> ApiResult<TeamDetails> {
        self.gateway
            .get(&format!("/times/{}/details", segment(slug)))
            .await
    }

    async fn team_roster(&self, slug: &str) -> ApiResult<Vec<RosterPlayer>> {
        self.gateway
            .get(&format!("/times/{}/roster", segment(slug)))
            .await
    }

    async fn team_schedule(&self, slug: &str) -> ApiResult<Schedule> {
        self.gateway
            .get(&format!("/times/{}/schedule", segment(slug)))
            .await
    }

    async fn players(&self, limit: u32) -> ApiResult<Vec<Player>> {
        self.gateway
            .get_query("/jogadores/", &[("limit", limit)])
            .await
    }

    async fn player_details(&self, slug: &str) -> ApiResult<PlayerDetails> {
        self.gateway
            .get(&format!("/jogadores/{}/details", segment(slug)))
            .await
    }

    async fn player_game_log(&self, slug: &str, season: &str) -> ApiResult<Vec<GameLogEntry>> {
        self.gateway
            .get(&format!(
                "/jogadores/{}/gamelog/{}",
                segment(slug),
                segment(season)
            ))
            .await
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<SearchResult>> {
        self.gateway.get_query("/search/", query).await
    }
}

#[async_trait]
impl ReviewApi for ApiClient {
    async fn game_reviews(&self, game_id: i64) -> ApiResult<Vec<Review>> {
        self.gateway
            .get(&format!("/jogos/{game_id}/avaliacoes/"))
            .await
    }

    async fn create_review(&self, game_id: i64, draft: &ReviewDraft) -> ApiResult<Review> {
        self.gateway
            .post(&format!("/jogos/{game_id}/avaliacoes/"), draft)
            .await
    }

    async fn update_review(&self, review_id: i64, draft: &ReviewDraft) -> ApiResult<Review> {
        self.gateway
            .put(&format!("/avaliacoes/{review_id}"), draft)
            .await
    }

    async fn delete_review(&self, review_id: i64) -> ApiResult<()> {
        self.gateway
            .delete_unit(&format!("/avaliacoes/{review_id}"))
            .await
    }

    async fn like_review(&self, review_id: i64) -> ApiResult<LikeReceipt> {
        self.gateway
            .post_empty(&format!("/avaliacoes/{review_id}/like"))
            .await
    }

    async fn unlike_review(&self, review_id: i64) -> ApiResult<LikeReceipt> {
        self.gateway
            .delete(&format!("/avaliacoes/{review_id}/like"))
            .await
    }

    async fn comments(&self, review_id: i64) -> ApiResult<Vec<Comment>> {
        self.gateway
            .get(&format!("/avaliacoes/{review_id}/comentarios"))
            .await
    }

    async fn post_comment(&self, review_id: i64, comment: &NewComment) -> ApiResult<Comment> {
        self.gateway
            .post(&format!("/avaliacoes/{review_id}/comentarios"), comment)
            .await
    }
}

#[async_trait]
impl SocialApi for ApiClient {
    async fn profile(&self, username: &str) -> ApiResult<UserProfile> {
        self.gateway
            .get(&format!("/usuarios/{}/profile", segment(username)))
            .await
    }

    async fn user_stats(&self, username: &str) -> ApiResult<UserStats> {
        self.gateway
            .get(&format!("/usuarios/{}/stats", segment(username)))
            .await
    }

    async fn followers(&self, username: &str) -> ApiResult<Vec<SocialUser>> {
        self.gateway
            .get(&format!("/usuarios/{}/followers", segment(username)))
            .await
    }

    async fn following(&self, username: &str) -> ApiResult<Vec<SocialUser>> {
        self.gateway
            .get(&format!("/usuarios/{}/following", segment(username)))
            .await
    }

    async fn follow(&self, user_id: i64) -> ApiResult<()> {
        self.gateway
            .post_unit(&format!("/usuarios/{user_id}/follow"))
            .await
    }

    async fn unfollow(&self, user_id: i64) -> ApiResult<()> {
        self.gateway
            .delete_unit(&format!("/usuarios/{user_id}/follow"))
            .await
    }

    async fn achievements(&self, user_id: i64) -> ApiResult<Vec<UnlockedAchievement>> {
        self.gateway
            .get(&format!("/usuarios/{user_id}/conquistas"))
            .await
    }

    async fn feed_for_you(&self) -> ApiResult<Vec<FeedReview>> {
        self.gateway.get("/feed/para-voce").await
    }

    async fn feed_following(&self) -> ApiResult<Vec<FeedReview>> {
        self.gateway.get("/feed/seguindo").await
    }
}
