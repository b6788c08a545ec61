// Browsing: game listings, teams, players, and search.

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::Args;

use courtside_app::{GamesView, PlayerView, PlayersView, SearchView, TeamView, TeamsView};
use courtside_core::models::{Game, GameFilter, SearchQuery};

use super::Context;
use crate::output;

#[derive(Debug, Clone, Default, Args)]
pub struct GamesArgs {
    /// Only games of this team, by abbreviation (e.g. BOS)
    #[arg(long)]
    pub team: Option<String>,
    /// Only games on this day, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Show trending games instead
    #[arg(long, conflicts_with_all = ["team", "date"])]
    pub trending: bool,
}

/// Free text searches player and team names; the flags narrow it.
#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Player or team name
    pub text: Option<String>,
    #[arg(long)]
    pub player: Option<String>,
    #[arg(long)]
    pub team: Option<String>,
    /// Team abbreviation, e.g. LAL
    #[arg(long)]
    pub abbreviation: Option<String>,
    /// Games where someone scored at least this many points; needs --season
    #[arg(long, requires = "season")]
    pub min_points: Option<u32>,
    #[arg(long)]
    pub season: Option<String>,
}

impl SearchArgs {
    pub fn into_query(self) -> SearchQuery {
        SearchQuery {
            player_name: self.player.or_else(|| self.text.clone()),
            min_points: self.min_points,
            season: self.season,
            team_name: self.team.or(self.text),
            team_abbreviation: self.abbreviation,
        }
    }
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

pub async fn games(ctx: &Context, args: GamesArgs) -> Result<()> {
    let mut view = GamesView::new(ctx.backend());
    if args.trending {
        view.load_trending().await?;
        print_games("Trending", view.trending());
        return Ok(());
    }

    view = view.with_filter(GameFilter {
        team_id: None,
        date: args.date,
    });
    view.load().await?;
    if let Some(abbreviation) = &args.team {
        let id = view
            .team_by_abbreviation(abbreviation)
            .map(|t| t.id)
            .ok_or_else(|| anyhow!("no team with abbreviation {abbreviation}"))?;
        view.filter_team(Some(id)).await?;
    }
    print_games("Games", view.games());
    Ok(())
}

fn print_games(title: &str, games: &[Game]) {
    println!("{title}");
    if games.is_empty() {
        println!("  no games");
    }
    for game in games {
        println!("  {}", output::game_line(game));
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

pub async fn teams(ctx: &Context) -> Result<()> {
    let mut view = TeamsView::new(ctx.backend());
    view.load().await?;
    for team in view.teams() {
        println!("{}", output::team_line(team));
    }
    Ok(())
}

pub async fn team(ctx: &Context, slug: &str) -> Result<()> {
    let mut view = TeamView::new(ctx.backend(), slug);
    view.load().await?;
    let Some(details) = view.details() else {
        bail!("team {slug} did not load");
    };
    for line in output::team_lines(details) {
        println!("{line}");
    }

    println!("Roster");
    for player in view.roster() {
        println!("  {}", output::roster_line(player));
    }
    if let Some(error) = view.roster_model().last_error() {
        eprintln!("could not load roster: {error}");
    }

    if let Some(schedule) = view.schedule() {
        print_games("Recent", &schedule.recent);
        print_games("Upcoming", &schedule.upcoming);
    }
    if let Some(error) = view.schedule_model().last_error() {
        eprintln!("could not load schedule: {error}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

pub async fn players(ctx: &Context, name: Option<&str>, limit: Option<u32>) -> Result<()> {
    let mut view = PlayersView::new(ctx.backend());
    if let Some(limit) = limit {
        view = view.with_limit(limit);
    }
    view.load().await?;
    let matches = view.matching(name.unwrap_or_default());
    if matches.is_empty() {
        println!("No players found");
    }
    for player in matches {
        println!("{}", output::player_line(player));
    }
    Ok(())
}

pub async fn player(ctx: &Context, slug: &str, season: Option<&str>) -> Result<()> {
    let mut view = PlayerView::new(ctx.backend(), slug);
    if let Some(season) = season {
        view = view.with_season(season);
    }
    view.load().await?;
    let Some(details) = view.details() else {
        bail!("player {slug} did not load");
    };
    for line in output::player_lines(details) {
        println!("{line}");
    }

    if let Some(season) = view.season() {
        println!("Game log {season}");
        for entry in view.game_log() {
            println!("  {}", output::game_log_line(entry));
        }
    }
    if let Some(error) = view.game_log_model().last_error() {
        eprintln!("could not load game log: {error}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

pub async fn search(ctx: &Context, args: SearchArgs) -> Result<()> {
    let mut view = SearchView::new(ctx.backend());
    view.search(args.into_query()).await?;
    if view.results().is_empty() {
        println!("Nothing found");
        return Ok(());
    }
    for player in view.players() {
        println!("player  {}", output::player_line(player));
    }
    for team in view.teams() {
        println!("team    {}", output::team_line(team));
    }
    for game in view.games() {
        println!("game    {}", output::game_line(game));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_searches_players_and_teams() {
        let query = SearchArgs {
            text: Some("boston".into()),
            ..SearchArgs::default()
        }
        .into_query();
        assert_eq!(query.player_name.as_deref(), Some("boston"));
        assert_eq!(query.team_name.as_deref(), Some("boston"));
        assert_eq!(query.min_points, None);
    }

    #[test]
    fn flags_override_free_text() {
        let query = SearchArgs {
            text: Some("boston".into()),
            player: Some("tatum".into()),
            min_points: Some(40),
            season: Some("2023-24".into()),
            ..SearchArgs::default()
        }
        .into_query();
        assert_eq!(query.player_name.as_deref(), Some("tatum"));
        assert_eq!(query.team_name.as_deref(), Some("boston"));
        assert_eq!(query.season.as_deref(), Some("2023-24"));
        assert_eq!(query.min_points, Some(40));
    }

    #[test]
    fn search_flags_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            args: SearchArgs,
        }

        let cli = Cli::try_parse_from(["search", "lakers", "--abbreviation", "LAL"]).unwrap();
        assert_eq!(cli.args.text.as_deref(), Some("lakers"));
        assert_eq!(cli.args.abbreviation.as_deref(), Some("LAL"));

        assert!(Cli::try_parse_from(["search", "--min-points", "40"]).is_err());
    }

    #[test]
    fn games_date_parses_as_a_day() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            args: GamesArgs,
        }

        let cli = Cli::try_parse_from(["games", "--date", "2024-03-01"]).unwrap();
        assert_eq!(cli.args.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(Cli::try_parse_from(["games", "--trending", "--team", "BOS"]).is_err());
    }
}
