// Games listing: every game, optionally narrowed to one team or one day, the
// team list that backs the team filter, and the trending list.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use courtside_api::{ApiError, Backend};
use courtside_core::models::{Game, GameFilter, Team};
use courtside_core::scope::ViewScope;

use crate::refetch::ReadModel;

pub struct GamesView {
    api: Arc<dyn Backend>,
    scope: ViewScope,
    filter: GameFilter,
    teams: ReadModel<Vec<Team>>,
    games: ReadModel<Vec<Game>>,
    trending: ReadModel<Vec<Game>>,
}

impl GamesView {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            scope: ViewScope::new("games"),
            filter: GameFilter::default(),
            teams: ReadModel::new(),
            games: ReadModel::new(),
            trending: ReadModel::new(),
        }
    }

    /// Start narrowed by `filter` instead of showing every game.
    pub fn with_filter(mut self, filter: GameFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn filter(&self) -> &GameFilter {
        &self.filter
    }

    pub fn teams(&self) -> &[Team] {
        self.teams.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn games(&self) -> &[Game] {
        self.games.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn games_model(&self) -> &ReadModel<Vec<Game>> {
        &self.games
    }

    pub fn trending(&self) -> &[Game] {
        self.trending.value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Team whose abbreviation matches, ignoring case. Needs the team list.
    pub fn team_by_abbreviation(&self, abbreviation: &str) -> Option<&Team> {
        self.teams()
            .iter()
            .find(|t| t.abbreviation.eq_ignore_ascii_case(abbreviation))
    }

    /// Fetch the team list and the filtered games together. A failed team
    /// list only disables the team filter; a failed game list is an error.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let api = self.api.clone();
        let filter = self.filter.clone();
        let (teams, games) = self
            .scope
            .run(async { tokio::join!(api.teams(), api.games(&filter)) })
            .await?;

        self.scope.commit(|| match teams {
            Ok(teams) => self.teams.set(teams),
            Err(e) => {
                warn!("failed to load teams: {e}");
                self.teams.fail(e.to_string());
            }
        })?;

        match games {
            Ok(games) => {
                info!(games = games.len(), teams = self.teams().len(), "games loaded");
                self.scope.commit(|| self.games.set(games))?;
                Ok(())
            }
            Err(e) => {
                warn!("failed to load games: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.games.fail(message))?;
                Err(e)
            }
        }
    }

    /// Narrow the list and refetch the games only. On failure the previous
    /// list stays, marked stale.
    pub async fn set_filter(&mut self, filter: GameFilter) -> Result<(), ApiError> {
        self.scope.commit(|| self.filter = filter.clone())?;
        let result = self.scope.run(self.api.games(&filter)).await?;
        match result {
            Ok(games) => {
                info!(?filter, games = games.len(), "game filter applied");
                self.scope.commit(|| self.games.set(games))?;
                Ok(())
            }
            Err(e) => {
                warn!(?filter, "failed to refilter games: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.games.fail(message))?;
                Err(e)
            }
        }
    }

    /// Restrict to games played by `team_id`, keeping any date filter.
    pub async fn filter_team(&mut self, team_id: Option<i64>) -> Result<(), ApiError> {
        let filter = GameFilter {
            team_id,
            ..self.filter.clone()
        };
        self.set_filter(filter).await
    }

    /// Restrict to games on `date`, keeping any team filter.
    pub async fn filter_date(&mut self, date: Option<NaiveDate>) -> Result<(), ApiError> {
        let filter = GameFilter {
            date,
            ..self.filter.clone()
        };
        self.set_filter(filter).await
    }

    pub async fn load_trending(&mut self) -> Result<(), ApiError> {
        match self.scope.run(self.api.trending_games()).await? {
            Ok(games) => {
                info!(games = games.len(), "trending games loaded");
                self.scope.commit(|| self.trending.set(games))?;
                Ok(())
            }
            Err(e) => {
                warn!("failed to load trending games: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.trending.fail(message))?;
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for GamesView {
    fn drop(&mut self) {
        self.scope.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{game, team, FakeBackend};
    use std::time::Duration;

    fn heat_home_game(id: i64) -> Game {
        let mut g = game(id);
        g.home_team_id = 3;
        g.home_team.abbreviation = "MIA".into();
        g.home_team.slug = "mia".into();
        g
    }

    fn backend() -> Arc<FakeBackend> {
        let api = Arc::new(FakeBackend::new());
        api.games.lock().unwrap().extend([game(1), heat_home_game(2)]);
        api.teams
            .lock()
            .unwrap()
            .extend([team(1, "BOS"), team(2, "LAL"), team(3, "MIA")]);
        api
    }

    #[tokio::test]
    async fn load_fetches_teams_and_games() {
        let api = backend();
        let mut view = GamesView::new(api.clone());

        view.load().await.unwrap();
        assert_eq!(view.games().len(), 2);
        assert_eq!(view.team_by_abbreviation("mia").map(|t| t.id), Some(3));
        assert_eq!(api.calls(), vec!["teams ", "games {}"]);
    }

    #[tokio::test]
    async fn filters_combine_and_go_to_the_server() {
        let api = backend();
        let mut view = GamesView::new(api.clone());
        view.load().await.unwrap();

        view.filter_team(Some(3)).await.unwrap();
        assert_eq!(view.games().iter().map(|g| g.id).collect::<Vec<_>>(), vec![2]);

        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        view.filter_date(Some(day)).await.unwrap();
        assert_eq!(view.filter().team_id, Some(3));
        assert_eq!(view.games().len(), 1);
        assert_eq!(
            api.calls().last().unwrap(),
            r#"games {"time_id":3,"data":"2024-03-01"}"#
        );

        view.filter_team(None).await.unwrap();
        assert_eq!(view.games().len(), 2);
    }

    #[tokio::test]
    async fn initial_filter_is_sent_on_first_load() {
        let api = backend();
        let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let mut view = GamesView::new(api.clone()).with_filter(GameFilter {
            team_id: None,
            date: Some(day),
        });

        view.load().await.unwrap();
        assert!(view.games().is_empty());
        assert_eq!(api.calls()[1], r#"games {"data":"2024-03-02"}"#);
    }

    #[tokio::test]
    async fn failed_refilter_keeps_previous_list_as_stale() {
        let api = backend();
        let mut view = GamesView::new(api.clone());
        view.load().await.unwrap();

        api.fail("games");
        assert!(view.filter_team(Some(3)).await.is_err());
        assert_eq!(view.games().len(), 2);
        assert!(view.games_model().is_stale());
    }

    #[tokio::test]
    async fn missing_team_list_does_not_block_games() {
        let api = backend();
        api.fail("teams");
        let mut view = GamesView::new(api);

        view.load().await.unwrap();
        assert!(view.teams().is_empty());
        assert!(view.team_by_abbreviation("BOS").is_none());
        assert_eq!(view.games().len(), 2);
    }

    #[tokio::test]
    async fn trending_is_its_own_list() {
        let api = backend();
        api.trending.lock().unwrap().push(heat_home_game(9));
        let mut view = GamesView::new(api.clone());

        view.load_trending().await.unwrap();
        assert_eq!(view.trending()[0].id, 9);
        assert!(view.games().is_empty());
        assert_eq!(api.count("games"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_view_ignores_late_results() {
        let api = backend();
        api.delay("games", Duration::from_secs(2));
        let mut view = GamesView::new(api);
        let scope = view.scope().clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            scope.close();
        });
        assert!(matches!(view.load().await, Err(ApiError::Cancelled)));
        assert!(view.games().is_empty());
        assert!(view.teams().is_empty());
    }
}
