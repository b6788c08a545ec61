// Player pages: the player list with a local name filter, and one player's
// details with a per-season game log.

use std::sync::Arc;

use tracing::{debug, info, warn};

use courtside_api::{ApiError, Backend};
use courtside_core::models::{GameLogEntry, Player, PlayerDetails};
use courtside_core::scope::ViewScope;

use crate::refetch::ReadModel;

/// How many players the list asks for; the service has no paging.
pub const PLAYER_LIST_LIMIT: u32 = 1000;

pub struct PlayersView {
    api: Arc<dyn Backend>,
    scope: ViewScope,
    limit: u32,
    players: ReadModel<Vec<Player>>,
}

impl PlayersView {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            scope: ViewScope::new("players"),
            limit: PLAYER_LIST_LIMIT,
            players: ReadModel::new(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn players(&self) -> &[Player] {
        self.players.value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Players whose name contains `term`, ignoring case. A blank term
    /// matches everyone. Filtering never goes back to the server.
    pub fn matching(&self, term: &str) -> Vec<&Player> {
        let term = term.trim().to_lowercase();
        self.players()
            .iter()
            .filter(|p| {
                term.is_empty()
                    || p.name.to_lowercase().contains(&term)
                    || p.normalized_name.contains(&term)
            })
            .collect()
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.scope.run(self.api.players(self.limit)).await? {
            Ok(players) => {
                info!(players = players.len(), "players loaded");
                self.scope.commit(|| self.players.set(players))?;
                Ok(())
            }
            Err(e) => {
                warn!("failed to load players: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.players.fail(message))?;
                Err(e)
            }
        }
    }
}

impl Drop for PlayersView {
    fn drop(&mut self) {
        self.scope.close();
    }
}

pub struct PlayerView {
    api: Arc<dyn Backend>,
    scope: ViewScope,
    slug: String,
    season: Option<String>,
    details: ReadModel<PlayerDetails>,
    game_log: ReadModel<Vec<GameLogEntry>>,
}

impl PlayerView {
    pub fn new(api: Arc<dyn Backend>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            scope: ViewScope::new(format!("player:{slug}")),
            api,
            slug,
            season: None,
            details: ReadModel::new(),
            game_log: ReadModel::new(),
        }
    }

    /// Show this season's game log instead of the latest one.
    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn details(&self) -> Option<&PlayerDetails> {
        self.details.value()
    }

    /// Season the game log belongs to, once one is known.
    pub fn season(&self) -> Option<&str> {
        self.season.as_deref()
    }

    pub fn game_log(&self) -> &[GameLogEntry] {
        self.game_log.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn game_log_model(&self) -> &ReadModel<Vec<GameLogEntry>> {
        &self.game_log
    }

    /// Load details, then the game log for the chosen season or, without a
    /// choice, the first season the details list. A player with no seasons
    /// gets no game log request. A failed log is recorded on its model and
    /// does not fail the page.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let details = match self.scope.run(self.api.player_details(&self.slug)).await? {
            Ok(details) => details,
            Err(e) => {
                warn!(player = %self.slug, "failed to load player: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.details.fail(message))?;
                return Err(e);
            }
        };

        let season = self
            .season
            .clone()
            .or_else(|| details.season_stats.first().map(|s| s.season.clone()));
        info!(player = %self.slug, seasons = details.season_stats.len(), "player loaded");
        self.scope.commit(|| {
            self.details.set(details);
            self.season = season.clone();
        })?;

        match season {
            Some(season) => match self.fetch_log(&season).await {
                Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
                _ => Ok(()),
            },
            None => {
                debug!(player = %self.slug, "no seasons, skipping game log");
                Ok(())
            }
        }
    }

    /// Switch the game log to another season.
    pub async fn set_season(&mut self, season: &str) -> Result<(), ApiError> {
        self.scope.commit(|| self.season = Some(season.to_string()))?;
        self.fetch_log(season).await
    }

    async fn fetch_log(&mut self, season: &str) -> Result<(), ApiError> {
        let result = self
            .scope
            .run(self.api.player_game_log(&self.slug, season))
            .await?;
        match result {
            Ok(entries) => {
                debug!(player = %self.slug, season, games = entries.len(), "game log loaded");
                self.scope.commit(|| {
                    // A newer season may have been picked while this loaded.
                    if self.season.as_deref() == Some(season) {
                        self.game_log.set(entries);
                    }
                })?;
                Ok(())
            }
            Err(e) => {
                warn!(player = %self.slug, season, "failed to load game log: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.game_log.fail(message))?;
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for PlayerView {
    fn drop(&mut self) {
        self.scope.close();
    }
}
