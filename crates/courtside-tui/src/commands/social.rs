// Profiles, follows, profile editing, and achievements.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use courtside_api::Upload;
use courtside_app::{AchievementsView, FollowList, ProfileEdit, ProfileView};
use courtside_core::models::ProfileUpdate;

use super::Context;
use crate::output;

#[derive(Debug, Clone, Default, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub favorite_team_id: Option<i64>,
    /// Image file to upload as the profile picture
    #[arg(long)]
    pub picture: Option<PathBuf>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.bio.is_none()
            && self.favorite_team_id.is_none()
            && self.picture.is_none()
    }

    fn into_edit(self) -> Result<ProfileEdit> {
        let picture = match &self.picture {
            Some(path) => Some(Upload::from_path(path)?),
            None => None,
        };
        Ok(ProfileEdit {
            update: ProfileUpdate {
                full_name: self.full_name,
                bio: self.bio,
                favorite_team_id: self.favorite_team_id,
                avatar_url: None,
            },
            picture,
        })
    }
}

fn own_username(ctx: &Context, action: &str) -> Result<String> {
    Ok(ctx.session.require_user(action)?.username)
}

pub async fn profile(ctx: &Context, username: Option<&str>) -> Result<()> {
    let username = match username {
        Some(name) => name.to_string(),
        None => own_username(ctx, "view your profile")?,
    };
    let mut view = ProfileView::new(ctx.backend(), ctx.session.clone(), &username);
    view.load().await?;
    let Some(page) = view.page() else {
        bail!("profile @{username} did not load");
    };

    let following =
        (ctx.session.is_authenticated() && !view.is_own_profile()).then(|| view.is_following());
    for line in output::profile_lines(page, following) {
        println!("{line}");
    }
    Ok(())
}

pub async fn follow(ctx: &Context, username: &str) -> Result<()> {
    let mut view = ProfileView::new(ctx.backend(), ctx.session.clone(), username);
    view.load().await?;
    let outcome = view.toggle_follow().await?;
    if outcome.is_stale() {
        eprintln!("Saved, but the profile could not be refreshed");
    }
    let verb = if *outcome.written() { "Following" } else { "Unfollowed" };
    println!("{verb} @{username}");
    Ok(())
}

pub async fn follow_list(ctx: &Context, username: Option<&str>, which: FollowList) -> Result<()> {
    let username = match username {
        Some(name) => name.to_string(),
        None => own_username(ctx, "list your follows")?,
    };
    let view = ProfileView::new(ctx.backend(), ctx.session.clone(), &username);
    let users = view.follow_list(which).await?;
    if users.is_empty() {
        println!("Nobody yet");
    }
    for user in &users {
        println!("{}", output::social_line(user));
    }
    Ok(())
}

pub async fn edit_profile(ctx: &Context, args: EditArgs) -> Result<()> {
    if args.is_empty() {
        bail!("nothing to change; pass --full-name, --bio, --favorite-team-id or --picture");
    }
    let username = own_username(ctx, "edit your profile")?;
    let mut view = ProfileView::new(ctx.backend(), ctx.session.clone(), &username);
    view.load().await?;

    let outcome = view.edit_profile(args.into_edit()?).await?;
    if outcome.is_stale() {
        eprintln!("Saved, but the profile could not be refreshed");
    }
    println!("Updated {}", output::user_line(outcome.written()));
    Ok(())
}

pub async fn achievements(ctx: &Context) -> Result<()> {
    let mut view = AchievementsView::mine(ctx.backend(), &ctx.session)?;
    view.load().await?;
    if let Some(board) = view.board() {
        for line in output::achievement_lines(board) {
            println!("{line}");
        }
    }
    Ok(())
}
