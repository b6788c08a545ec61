// Courtside entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Parse the command line
// 3. Open the context (config, HTTP client, stored session)
// 4. Run the command

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use courtside_app::FollowList;
use courtside_core::models::NewUser;
use courtside_tui::commands::catalog::{GamesArgs, SearchArgs};
use courtside_tui::commands::games::{ReviewArgs, Window};
use courtside_tui::commands::social::EditArgs;
use courtside_tui::commands::{account, catalog, games, live, social, Context};

/// Courtside - rate and discuss basketball games from your terminal
#[derive(Parser)]
#[command(name = "courtside", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        email: String,
        #[arg(long, env = "COURTSIDE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Register {
        username: String,
        email: String,
        #[arg(long, env = "COURTSIDE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        favorite_team_id: Option<i64>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Featured and upcoming games
    Landing {
        /// Featured games window
        #[arg(long, value_enum, default_value_t = Window::Week)]
        window: Window,
    },

    /// Your review feed
    Feed {
        /// Only reviews from people you follow
        #[arg(long)]
        following: bool,
    },

    /// Game page: score, averages, and reviews
    Game {
        /// Game slug, e.g. bos-vs-lal-2024-03-01-9
        slug: String,
        /// Also list both rosters with player ids
        #[arg(long)]
        rosters: bool,
    },

    /// Write, edit, or delete your review of a game
    Review {
        slug: String,
        #[command(flatten)]
        args: ReviewArgs,
    },

    /// Like or unlike a review on a game page
    Like { slug: String, review_id: i64 },

    /// Show the comment thread of a review
    Comments { review_id: i64 },

    /// Comment on a review
    Comment {
        review_id: i64,
        text: String,
        /// Reply to this comment id
        #[arg(long)]
        reply_to: Option<i64>,
    },

    /// Show a profile (yours when no username is given)
    Profile { username: Option<String> },

    /// Follow or unfollow a user
    Follow { username: String },

    /// List a user's followers
    Followers { username: Option<String> },

    /// List who a user follows
    Following { username: Option<String> },

    /// Edit your profile
    EditProfile {
        #[command(flatten)]
        args: EditArgs,
    },

    /// Your achievements
    Achievements,

    /// List games, optionally for one team or day
    Games {
        #[command(flatten)]
        args: GamesArgs,
    },

    /// List every team
    Teams,

    /// Team page: titles, roster, and schedule
    Team {
        /// Team slug, e.g. celtics
        slug: String,
    },

    /// List players, optionally filtered by name
    Players {
        /// Part of the player's name
        name: Option<String>,
        /// How many players to fetch
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Player page: bio, season averages, and a game log
    Player {
        /// Player slug, e.g. lebron-james
        slug: String,
        /// Season for the game log, e.g. 2023-24 (defaults to the latest)
        #[arg(long)]
        season: Option<String>,
    },

    /// Search players, teams, and high-scoring games
    Search {
        #[command(flatten)]
        args: SearchArgs,
    },

    /// Live box score for a game in progress
    Live { game_id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("logging disabled: {e:#}");
    }
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("command failed: {e:#}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::open().await?;
    info!("courtside starting");

    match cli.command {
        Commands::Login { email, password } => account::login(&ctx, &email, &password).await,
        Commands::Register {
            username,
            email,
            password,
            full_name,
            favorite_team_id,
        } => {
            let new_user = NewUser {
                username,
                email,
                password,
                full_name,
                favorite_team_id,
                avatar_url: None,
            };
            account::register(&ctx, new_user).await
        }
        Commands::Logout => account::logout(&ctx),
        Commands::Whoami => account::whoami(&ctx),
        Commands::Landing { window } => games::landing(&ctx, window).await,
        Commands::Feed { following } => games::feed(&ctx, following).await,
        Commands::Game { slug, rosters } => games::game(&ctx, &slug, rosters).await,
        Commands::Review { slug, args } => games::review(&ctx, &slug, &args).await,
        Commands::Like { slug, review_id } => games::like(&ctx, &slug, review_id).await,
        Commands::Comments { review_id } => games::comments(&ctx, review_id).await,
        Commands::Comment {
            review_id,
            text,
            reply_to,
        } => games::comment(&ctx, review_id, &text, reply_to).await,
        Commands::Profile { username } => social::profile(&ctx, username.as_deref()).await,
        Commands::Follow { username } => social::follow(&ctx, &username).await,
        Commands::Followers { username } => {
            social::follow_list(&ctx, username.as_deref(), FollowList::Followers).await
        }
        Commands::Following { username } => {
            social::follow_list(&ctx, username.as_deref(), FollowList::Following).await
        }
        Commands::EditProfile { args } => social::edit_profile(&ctx, args).await,
        Commands::Achievements => social::achievements(&ctx).await,
        Commands::Games { args } => catalog::games(&ctx, args).await,
        Commands::Teams => catalog::teams(&ctx).await,
        Commands::Team { slug } => catalog::team(&ctx, &slug).await,
        Commands::Players { name, limit } => catalog::players(&ctx, name.as_deref(), limit).await,
        Commands::Player { slug, season } => {
            catalog::player(&ctx, &slug, season.as_deref()).await
        }
        Commands::Search { args } => catalog::search(&ctx, args).await,
        Commands::Live { game_id } => live::run(&ctx, game_id).await,
    }
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("courtside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtside=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
