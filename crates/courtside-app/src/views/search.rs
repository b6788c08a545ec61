// Advanced search across players, games and teams.

use std::sync::Arc;

use tracing::{info, warn};

use courtside_api::{ApiError, Backend};
use courtside_core::models::{Game, Player, SearchQuery, SearchResult, Team};
use courtside_core::scope::ViewScope;

use crate::refetch::ReadModel;

/// Trim every text criterion and drop the blank ones.
pub fn normalize(query: SearchQuery) -> SearchQuery {
    let clean = |s: Option<String>| {
        s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };
    SearchQuery {
        player_name: clean(query.player_name),
        min_points: query.min_points,
        season: clean(query.season),
        team_name: clean(query.team_name),
        team_abbreviation: clean(query.team_abbreviation),
    }
}

/// The service only searches games when it has both a minimum score and a
/// season, and returns nothing for a query without criteria. Both cases are
/// caught here instead.
pub fn validate_query(query: &SearchQuery) -> Result<(), ApiError> {
    if query.min_points.is_some() != query.season.is_some() {
        return Err(ApiError::invalid(
            "search",
            "a minimum score and a season only work together",
        ));
    }
    let any = query.player_name.is_some()
        || query.min_points.is_some()
        || query.team_name.is_some()
        || query.team_abbreviation.is_some();
    if !any {
        return Err(ApiError::invalid("search", "nothing to search for"));
    }
    Ok(())
}

pub struct SearchView {
    api: Arc<dyn Backend>,
    scope: ViewScope,
    query: SearchQuery,
    results: ReadModel<Vec<SearchResult>>,
}

impl SearchView {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            scope: ViewScope::new("search"),
            query: SearchQuery::default(),
            results: ReadModel::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Last query sent, after normalizing.
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        self.results.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.results().iter().filter_map(|hit| match hit {
            SearchResult::Player(p) => Some(p.as_ref()),
            _ => None,
        })
    }

    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.results().iter().filter_map(|hit| match hit {
            SearchResult::Game(g) => Some(g.as_ref()),
            _ => None,
        })
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.results().iter().filter_map(|hit| match hit {
            SearchResult::Team(t) => Some(t),
            _ => None,
        })
    }

    /// Run `query`. An invalid query is rejected without a request and
    /// leaves earlier results in place.
    pub async fn search(&mut self, query: SearchQuery) -> Result<(), ApiError> {
        let query = normalize(query);
        validate_query(&query)?;

        let result = self.scope.run(self.api.search(&query)).await?;
        match result {
            Ok(hits) => {
                info!(?query, hits = hits.len(), "search finished");
                self.scope.commit(|| {
                    self.results.set(hits);
                    self.query = query;
                })?;
                Ok(())
            }
            Err(e) => {
                warn!(?query, "search failed: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.results.fail(message))?;
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for SearchView {
    fn drop(&mut self) {
        self.scope.close();
    }
}
