// Team pages: the league's team list, and one team's details with its roster
// and schedule.

use std::sync::Arc;

use tracing::{info, warn};

use courtside_api::{ApiError, Backend};
use courtside_core::models::{RosterPlayer, Schedule, Team, TeamDetails};
use courtside_core::scope::ViewScope;
use courtside_core::theme::{team_theme, TeamTheme};

use crate::refetch::ReadModel;

pub struct TeamsView {
    api: Arc<dyn Backend>,
    scope: ViewScope,
    teams: ReadModel<Vec<Team>>,
}

impl TeamsView {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            scope: ViewScope::new("teams"),
            teams: ReadModel::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Teams sorted by name.
    pub fn teams(&self) -> &[Team] {
        self.teams.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.scope.run(self.api.teams()).await? {
            Ok(mut teams) => {
                teams.sort_by(|a, b| a.name.cmp(&b.name));
                info!(teams = teams.len(), "teams loaded");
                self.scope.commit(|| self.teams.set(teams))?;
                Ok(())
            }
            Err(e) => {
                warn!("failed to load teams: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.teams.fail(message))?;
                Err(e)
            }
        }
    }
}

impl Drop for TeamsView {
    fn drop(&mut self) {
        self.scope.close();
    }
}

pub struct TeamView {
    api: Arc<dyn Backend>,
    scope: ViewScope,
    slug: String,
    details: ReadModel<TeamDetails>,
    roster: ReadModel<Vec<RosterPlayer>>,
    schedule: ReadModel<Schedule>,
}

impl TeamView {
    pub fn new(api: Arc<dyn Backend>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            scope: ViewScope::new(format!("team:{slug}")),
            api,
            slug,
            details: ReadModel::new(),
            roster: ReadModel::new(),
            schedule: ReadModel::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn details(&self) -> Option<&TeamDetails> {
        self.details.value()
    }

    pub fn roster(&self) -> &[RosterPlayer] {
        self.roster.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn roster_model(&self) -> &ReadModel<Vec<RosterPlayer>> {
        &self.roster
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.value()
    }

    pub fn schedule_model(&self) -> &ReadModel<Schedule> {
        &self.schedule
    }

    pub fn theme(&self) -> TeamTheme {
        team_theme(self.details().map(|d| d.team.abbreviation.as_str()))
    }

    /// Details first; roster and schedule then go out together under the
    /// slug the server answered with. Only a failed details fetch is an
    /// error. The other two record their failure on their own model.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let details = match self.scope.run(self.api.team_details(&self.slug)).await? {
            Ok(details) => details,
            Err(e) => {
                warn!(team = %self.slug, "failed to load team: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.details.fail(message))?;
                return Err(e);
            }
        };

        let slug = details.team.slug.clone().unwrap_or_else(|| self.slug.clone());
        self.scope.commit(|| self.details.set(details))?;

        let api = self.api.clone();
        let (roster, schedule) = self
            .scope
            .run(async { tokio::join!(api.team_roster(&slug), api.team_schedule(&slug)) })
            .await?;

        self.scope.commit(|| {
            match roster {
                Ok(players) => self.roster.set(players),
                Err(e) => {
                    warn!(team = %slug, "failed to load roster: {e}");
                    self.roster.fail(e.to_string());
                }
            }
            match schedule {
                Ok(schedule) => self.schedule.set(schedule),
                Err(e) => {
                    warn!(team = %slug, "failed to load schedule: {e}");
                    self.schedule.fail(e.to_string());
                }
            }
        })?;
        info!(team = %slug, players = self.roster().len(), "team loaded");
        Ok(())
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for TeamView {
    fn drop(&mut self) {
        self.scope.close();
    }
}
