// Landing page: featured games, upcoming games, and the two review feeds.
//
// Loading runs in a background task bounded by the view's scope. Each list
// fails on its own; a failed list stays empty and the error is kept for the
// status line.

use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use courtside_api::{ApiError, Backend, Session};
use courtside_core::models::{FeaturedGame, FeaturedWindow, Game};
use courtside_core::scope::{Cancelled, ViewScope};

use crate::optimistic::LikeState;
use crate::views::reviews::{FeedItem, LikeCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedTab {
    #[default]
    ForYou,
    Following,
}

#[derive(Debug, Clone, Default)]
pub struct LandingState {
    pub filter: FeaturedWindow,
    pub featured: Vec<FeaturedGame>,
    pub upcoming: Vec<Game>,
    pub for_you: Vec<FeedItem>,
    pub following: Vec<FeedItem>,
    pub loading: bool,
    pub errors: Vec<String>,
}

impl LandingState {
    pub fn feed(&self, tab: FeedTab) -> &[FeedItem] {
        match tab {
            FeedTab::ForYou => &self.for_you,
            FeedTab::Following => &self.following,
        }
    }

    fn like_cell(&mut self, tab: FeedTab, review_id: i64) -> Option<&mut LikeCell> {
        let feed = match tab {
            FeedTab::ForYou => &mut self.for_you,
            FeedTab::Following => &mut self.following,
        };
        feed.iter_mut()
            .find(|item| item.review.id == review_id)
            .map(|item| &mut item.like)
    }
}

/// Keep the list on success; on failure empty it and record why.
fn absorb<T>(
    slot: &mut Vec<T>,
    errors: &mut Vec<String>,
    what: &str,
    result: Result<Vec<T>, ApiError>,
) {
    match result {
        Ok(items) => *slot = items,
        Err(e) => {
            warn!("failed to load {what}: {e}");
            slot.clear();
            errors.push(format!("{what}: {e}"));
        }
    }
}

pub struct LandingView {
    api: Arc<dyn Backend>,
    session: Arc<Session>,
    scope: ViewScope,
    state: Arc<RwLock<LandingState>>,
    featured_limit: u32,
}

impl LandingView {
    pub fn new(api: Arc<dyn Backend>, session: Arc<Session>, featured_limit: u32) -> Self {
        Self {
            api,
            session,
            scope: ViewScope::new("landing"),
            state: Arc::new(RwLock::new(LandingState::default())),
            featured_limit,
        }
    }

    /// Start from a featured window other than the default.
    pub fn with_filter(self, window: FeaturedWindow) -> Self {
        self.state.write().expect("landing state lock poisoned").filter = window;
        self
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Copy of the current state for rendering.
    pub fn state(&self) -> LandingState {
        self.state.read().expect("landing state lock poisoned").clone()
    }

    /// Fetch all four lists concurrently. Feeds are only requested for a
    /// logged-in user.
    pub fn load(&self) -> JoinHandle<Result<(), Cancelled>> {
        let api = self.api.clone();
        let state = self.state.clone();
        let scope = self.scope.clone();
        let limit = self.featured_limit;
        let signed_in = self.session.is_authenticated();

        let window = {
            let mut s = self.state.write().expect("landing state lock poisoned");
            s.loading = true;
            s.errors.clear();
            s.filter
        };

        self.scope.spawn(async move {
            let feeds = async {
                if signed_in {
                    tokio::join!(api.feed_for_you(), api.feed_following())
                } else {
                    (Ok(Vec::new()), Ok(Vec::new()))
                }
            };
            let (featured, upcoming, (for_you, following)) = tokio::join!(
                api.featured_games(window, limit),
                api.upcoming_games(),
                feeds
            );

            let committed = scope.commit(|| {
                let mut s = state.write().expect("landing state lock poisoned");
                let s = &mut *s;
                absorb(&mut s.featured, &mut s.errors, "featured games", featured);
                absorb(&mut s.upcoming, &mut s.errors, "upcoming games", upcoming);
                let for_you = for_you.map(|v| v.into_iter().map(FeedItem::new).collect());
                let following = following.map(|v| v.into_iter().map(FeedItem::new).collect());
                absorb(&mut s.for_you, &mut s.errors, "for-you feed", for_you);
                absorb(&mut s.following, &mut s.errors, "following feed", following);
                s.loading = false;
                info!(
                    featured = s.featured.len(),
                    upcoming = s.upcoming.len(),
                    errors = s.errors.len(),
                    "landing loaded"
                );
            });
            if committed.is_err() {
                debug!("landing closed before load finished");
            }
        })
    }

    /// Switch the featured-games window and refetch that list only. On
    /// failure the previous list stays.
    pub async fn set_filter(&self, window: FeaturedWindow) -> Result<(), ApiError> {
        self.scope.commit(|| {
            self.state.write().expect("landing state lock poisoned").filter = window;
        })?;

        let result = self
            .scope
            .run(self.api.featured_games(window, self.featured_limit))
            .await?;

        self.scope.commit(|| {
            let mut s = self.state.write().expect("landing state lock poisoned");
            // A newer filter may have been chosen while this one was loading.
            if s.filter != window {
                return Ok(());
            }
            match result {
                Ok(games) => {
                    s.featured = games;
                    Ok(())
                }
                Err(e) => {
                    warn!(window = window.as_query(), "failed to load featured games: {e}");
                    s.errors.push(format!("featured games: {e}"));
                    Err(e)
                }
            }
        })?
    }

    /// Optimistic like toggle on a feed entry.
    pub async fn toggle_feed_like(
        &self,
        tab: FeedTab,
        review_id: i64,
    ) -> Result<LikeState, ApiError> {
        let pending = {
            let mut s = self.state.write().expect("landing state lock poisoned");
            let cell = s
                .like_cell(tab, review_id)
                .ok_or_else(|| {
                    ApiError::invalid("review", format!("review {review_id} is not in the feed"))
                })?;
            cell.begin(&self.session)?
        };

        let response = pending.send(self.api.as_ref()).await;

        let outcome = self.scope.commit(|| {
            let mut s = self.state.write().expect("landing state lock poisoned");
            s.like_cell(tab, review_id).map(|cell| cell.finish(response))
        })?;

        match outcome {
            Some(outcome) => match outcome.error {
                Some(e) => Err(e),
                None => Ok(outcome.state),
            },
            // The feed was reloaded while the request was out; the reload
            // already carries the server's state.
            None => Err(ApiError::invalid("review", format!("review {review_id} left the feed"))),
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for LandingView {
    fn drop(&mut self) {
        self.scope.close();
    }
}
