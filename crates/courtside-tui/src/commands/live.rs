// `courtside live <game_id>`: full-screen live box score.

use anyhow::{Context as _, Result};
use tracing::info;

use courtside_live::{game_url, subscribe, LiveStatus};

use super::Context;
use crate::live_view;

pub async fn run(ctx: &Context, game_id: i64) -> Result<()> {
    let url = game_url(&ctx.config.api.ws_base(), game_id).context("failed to build live URL")?;
    info!(game = game_id, %url, "opening live feed");

    let (subscription, events) = subscribe(url, ctx.config.live.clone());
    let board = live_view::run(game_id, subscription, events).await?;

    if let LiveStatus::Errored(reason) = &board.status {
        eprintln!("live feed stopped: {reason}");
    }
    Ok(())
}
