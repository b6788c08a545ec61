// Landing page, game pages, reviews, likes, and comment threads.

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};

use courtside_app::views::game_detail::Rosters;
use courtside_app::{
    CommentThread, FeedTab, GameDetailView, LandingView, ReviewForm, WriteOutcome,
};
use courtside_core::models::FeaturedWindow;
use courtside_core::scope::ViewScope;

use super::Context;
use crate::output;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Window {
    #[default]
    Week,
    ThreeDays,
    Yesterday,
}

impl From<Window> for FeaturedWindow {
    fn from(window: Window) -> Self {
        match window {
            Window::Week => FeaturedWindow::ThisWeek,
            Window::ThreeDays => FeaturedWindow::LastThreeDays,
            Window::Yesterday => FeaturedWindow::Yesterday,
        }
    }
}

/// Scores and picks for `courtside review`. Scores run 0.5 to 5.0 in half
/// steps.
#[derive(Debug, Clone, Default, Args)]
pub struct ReviewArgs {
    /// Overall score; required for a new review
    #[arg(long)]
    pub overall: Option<f64>,
    #[arg(long)]
    pub home_attack: Option<f64>,
    #[arg(long)]
    pub home_defense: Option<f64>,
    #[arg(long)]
    pub away_attack: Option<f64>,
    #[arg(long)]
    pub away_defense: Option<f64>,
    #[arg(long)]
    pub officiating: Option<f64>,
    #[arg(long)]
    pub atmosphere: Option<f64>,
    /// Review text
    #[arg(long)]
    pub text: Option<String>,
    /// Player id of the best player
    #[arg(long)]
    pub best: Option<i64>,
    /// Player id of the worst player
    #[arg(long)]
    pub worst: Option<i64>,
    /// Delete your review instead
    #[arg(long, conflicts_with_all = ["overall", "text", "best", "worst"])]
    pub delete: bool,
}

impl ReviewArgs {
    fn picks_players(&self) -> bool {
        self.best.is_some() || self.worst.is_some()
    }
}

/// Fold command-line values into a form, starting from the existing review
/// when there is one.
pub fn build_form(existing: Option<ReviewForm>, args: &ReviewArgs) -> Result<ReviewForm> {
    let mut form = match (existing, args.overall) {
        (Some(mut form), overall) => {
            if let Some(overall) = overall {
                form.draft.scores.overall = overall;
            }
            form
        }
        (None, Some(overall)) => ReviewForm::new(overall),
        (None, None) => bail!("--overall is required for a new review"),
    };

    let scores = &mut form.draft.scores;
    for (slot, value) in [
        (&mut scores.home_attack, args.home_attack),
        (&mut scores.home_defense, args.home_defense),
        (&mut scores.away_attack, args.away_attack),
        (&mut scores.away_defense, args.away_defense),
        (&mut scores.officiating, args.officiating),
        (&mut scores.atmosphere, args.atmosphere),
    ] {
        if value.is_some() {
            *slot = value;
        }
    }
    if let Some(text) = &args.text {
        form.draft.text = Some(text.clone()).filter(|t| !t.trim().is_empty());
    }
    if let Some(best) = args.best {
        if form.draft.best_player_id != Some(best) {
            form.pick_best(best);
        }
    }
    if let Some(worst) = args.worst {
        if form.draft.worst_player_id != Some(worst) {
            form.pick_worst(worst);
        }
    }
    Ok(form)
}

fn check_roster(rosters: &Rosters, player_id: Option<i64>) -> Result<()> {
    let Some(id) = player_id else {
        return Ok(());
    };
    if rosters.home.iter().chain(&rosters.away).any(|p| p.id == id) {
        Ok(())
    } else {
        bail!("player {id} did not play for either team")
    }
}

fn report_refetch<W>(outcome: &WriteOutcome<W>) {
    if outcome.is_stale() {
        eprintln!("Saved, but the review list could not be refreshed");
    }
}

// ---------------------------------------------------------------------------
// Landing
// ---------------------------------------------------------------------------

fn landing_view(ctx: &Context) -> LandingView {
    let limit = ctx.config.landing.featured_limit;
    LandingView::new(ctx.backend(), ctx.session.clone(), limit)
}

pub async fn landing(ctx: &Context, window: Window) -> Result<()> {
    let view = landing_view(ctx).with_filter(window.into());
    view.load().await??;
    let state = view.state();

    println!("Featured ({})", state.filter.as_query());
    for game in &state.featured {
        println!("  {}", output::featured_line(game));
    }
    println!("Upcoming");
    for game in &state.upcoming {
        println!("  {}", output::game_line(game));
    }
    if ctx.session.is_authenticated() {
        println!("For you");
        for item in state.feed(FeedTab::ForYou) {
            println!("  {}", output::feed_line(item));
        }
    }
    for error in &state.errors {
        eprintln!("could not load {error}");
    }
    Ok(())
}

pub async fn feed(ctx: &Context, following: bool) -> Result<()> {
    ctx.session.require_user("see your feed")?;
    let view = landing_view(ctx);
    view.load().await??;
    let state = view.state();
    let tab = if following { FeedTab::Following } else { FeedTab::ForYou };

    let items = state.feed(tab);
    if items.is_empty() {
        println!("Nothing here yet");
    }
    for item in items {
        println!("{}", output::feed_line(item));
    }
    for error in &state.errors {
        eprintln!("could not load {error}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Game page
// ---------------------------------------------------------------------------

async fn open_game(ctx: &Context, slug: &str) -> Result<GameDetailView> {
    let mut view = GameDetailView::new(ctx.backend(), ctx.session.clone(), slug);
    view.load().await?;
    Ok(view)
}

pub async fn game(ctx: &Context, slug: &str, rosters: bool) -> Result<()> {
    let mut view = open_game(ctx, slug).await?;
    let Some(game) = view.game().cloned() else {
        bail!("game {slug} did not load");
    };

    println!("{}", output::game_line(&game));
    println!(
        "overall {} over {} reviews",
        view.overall_average().map(output::score).unwrap_or_else(|| "-".into()),
        view.reviews().len()
    );
    println!("{}", output::averages_line(&game.home_team.abbreviation, view.team_averages(true)));
    println!("{}", output::averages_line(&game.away_team.abbreviation, view.team_averages(false)));
    for item in view.reviews() {
        println!("  {}", output::review_line(item));
    }
    if view.reviews_model().is_stale() {
        eprintln!("review list may be out of date");
    }

    if rosters {
        view.load_rosters().await?;
        if let Some(rosters) = view.rosters() {
            for (abbr, players) in [
                (&game.home_team.abbreviation, &rosters.home),
                (&game.away_team.abbreviation, &rosters.away),
            ] {
                println!("{abbr} roster");
                for p in players {
                    println!("  {:>6}  {}", p.id, p.name);
                }
            }
        }
    }
    Ok(())
}

pub async fn review(ctx: &Context, slug: &str, args: &ReviewArgs) -> Result<()> {
    ctx.session.require_user("review games")?;
    let mut view = open_game(ctx, slug).await?;
    let existing = view.my_review().cloned();

    if args.delete {
        let Some(review) = existing else {
            bail!("you have not reviewed {slug}");
        };
        let outcome = view.delete_review(review.id).await?;
        report_refetch(&outcome);
        println!("Deleted review #{}", review.id);
        return Ok(());
    }

    let form = build_form(existing.as_ref().map(ReviewForm::edit), args)?;
    if args.picks_players() {
        view.load_rosters().await?;
        if let Some(rosters) = view.rosters() {
            check_roster(rosters, form.draft.best_player_id)?;
            check_roster(rosters, form.draft.worst_player_id)?;
        }
    }

    let outcome = view.submit_review(&form).await?;
    report_refetch(&outcome);
    let verb = if existing.is_some() { "Updated" } else { "Posted" };
    println!("{verb} review #{}", outcome.written().id);
    Ok(())
}

pub async fn like(ctx: &Context, slug: &str, review_id: i64) -> Result<()> {
    let mut view = open_game(ctx, slug).await?;
    let state = view.toggle_like(review_id).await?;
    let verb = if state.liked { "Liked" } else { "Unliked" };
    println!("{verb} review #{review_id} ({} likes)", state.count);
    Ok(())
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub async fn comments(ctx: &Context, review_id: i64) -> Result<()> {
    let scope = ViewScope::new(format!("comments:{review_id}"));
    let mut thread = CommentThread::new(review_id);
    thread.load(ctx.api.as_ref(), &scope).await?;
    let lines = output::comment_lines(thread.comments());
    if lines.is_empty() {
        println!("No comments yet");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub async fn comment(
    ctx: &Context,
    review_id: i64,
    text: &str,
    reply_to: Option<i64>,
) -> Result<()> {
    let scope = ViewScope::new(format!("comments:{review_id}"));
    let mut thread = CommentThread::new(review_id);
    let Some(outcome) = thread
        .post(ctx.api.as_ref(), &ctx.session, &scope, text, reply_to)
        .await?
    else {
        bail!("comment text is empty");
    };
    if outcome.is_stale() {
        eprintln!("Posted, but the thread could not be refreshed");
    }
    println!("Posted comment #{}", outcome.written().id);
    for line in output::comment_lines(thread.comments()) {
        println!("{line}");
    }
    Ok(())
}
