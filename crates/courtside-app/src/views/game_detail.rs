// Game page: the game, its reviews, per-team averages, and the review form.

use std::sync::Arc;

use tracing::{info, warn};

use courtside_api::{ApiError, Backend, Session};
use courtside_core::models::{Game, Review, ReviewDraft, RosterPlayer, Scores};
use courtside_core::scope::ViewScope;

use crate::optimistic::LikeState;
use crate::refetch::{write_then_refetch, ReadModel, WriteOutcome};
use crate::views::reviews::{review_items, ReviewItem};

pub const MIN_SCORE: f64 = 0.5;
pub const MAX_SCORE: f64 = 5.0;

// ---------------------------------------------------------------------------
// Scoring helpers
// ---------------------------------------------------------------------------

/// Numeric id at the end of a game slug (`bos-vs-lal-2024-03-01-812` -> 812).
pub fn game_id_from_slug(slug: &str) -> Option<i64> {
    slug.rsplit('-').next()?.parse().ok()
}

/// Every present score must be a half step between 0.5 and 5.0.
pub fn validate_scores(scores: &Scores) -> Result<(), ApiError> {
    for (name, value) in scores.entries() {
        let Some(value) = value else { continue };
        let doubled = value * 2.0;
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) || doubled.fract() != 0.0 {
            return Err(ApiError::invalid(
                name,
                format!("{value} is not a half step between {MIN_SCORE} and {MAX_SCORE}"),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamAverages {
    pub attack: Option<f64>,
    pub defense: Option<f64>,
}

impl TeamAverages {
    /// Mean of whichever of attack and defense have ratings.
    pub fn combined(&self) -> Option<f64> {
        mean(self.attack.into_iter().chain(self.defense))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}

/// Averages for the home (`home = true`) or away side. Reviews that skipped a
/// score do not count toward that score's average.
pub fn team_averages(reviews: &[Review], home: bool) -> TeamAverages {
    let pick = |attack: bool| {
        mean(reviews.iter().filter_map(|r| match (home, attack) {
            (true, true) => r.scores.home_attack,
            (true, false) => r.scores.home_defense,
            (false, true) => r.scores.away_attack,
            (false, false) => r.scores.away_defense,
        }))
    };
    TeamAverages {
        attack: pick(true),
        defense: pick(false),
    }
}

pub fn overall_average(reviews: &[Review]) -> Option<f64> {
    mean(reviews.iter().map(|r| r.scores.overall))
}

// ---------------------------------------------------------------------------
// Review form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewForm {
    /// Review being edited; `None` creates a new one.
    pub editing: Option<i64>,
    pub draft: ReviewDraft,
}

impl ReviewForm {
    pub fn new(overall: f64) -> Self {
        Self {
            editing: None,
            draft: ReviewDraft {
                scores: Scores {
                    overall,
                    ..Scores::default()
                },
                ..ReviewDraft::default()
            },
        }
    }

    pub fn edit(review: &Review) -> Self {
        Self {
            editing: Some(review.id),
            draft: review.to_draft(),
        }
    }

    /// Choose (or clear, when picked again) the best player. A player cannot
    /// be both best and worst.
    pub fn pick_best(&mut self, player_id: i64) {
        if self.draft.best_player_id == Some(player_id) {
            self.draft.best_player_id = None;
        } else {
            self.draft.best_player_id = Some(player_id);
            if self.draft.worst_player_id == Some(player_id) {
                self.draft.worst_player_id = None;
            }
        }
    }

    pub fn pick_worst(&mut self, player_id: i64) {
        if self.draft.worst_player_id == Some(player_id) {
            self.draft.worst_player_id = None;
        } else {
            self.draft.worst_player_id = Some(player_id);
            if self.draft.best_player_id == Some(player_id) {
                self.draft.best_player_id = None;
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rosters {
    pub home: Vec<RosterPlayer>,
    pub away: Vec<RosterPlayer>,
}

// ---------------------------------------------------------------------------
// GameDetailView
// ---------------------------------------------------------------------------

pub struct GameDetailView {
    api: Arc<dyn Backend>,
    session: Arc<Session>,
    scope: ViewScope,
    slug: String,
    game: ReadModel<Game>,
    reviews: ReadModel<Vec<ReviewItem>>,
    rosters: ReadModel<Rosters>,
}

impl GameDetailView {
    pub fn new(api: Arc<dyn Backend>, session: Arc<Session>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            scope: ViewScope::new(format!("game:{slug}")),
            api,
            session,
            slug,
            game: ReadModel::new(),
            reviews: ReadModel::new(),
            rosters: ReadModel::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.value()
    }

    pub fn reviews(&self) -> &[ReviewItem] {
        self.reviews.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn reviews_model(&self) -> &ReadModel<Vec<ReviewItem>> {
        &self.reviews
    }

    pub fn rosters(&self) -> Option<&Rosters> {
        self.rosters.value()
    }

    fn plain_reviews(&self) -> Vec<Review> {
        self.reviews().iter().map(|i| i.review().clone()).collect()
    }

    pub fn team_averages(&self, home: bool) -> TeamAverages {
        team_averages(&self.plain_reviews(), home)
    }

    pub fn overall_average(&self) -> Option<f64> {
        overall_average(&self.plain_reviews())
    }

    /// The logged-in user's review of this game, if any.
    pub fn my_review(&self) -> Option<&Review> {
        let me = self.session.current_user()?;
        self.reviews()
            .iter()
            .map(ReviewItem::review)
            .find(|r| r.author.id == me.id)
    }

    /// Load the game and its reviews. When the slug ends in the game id both
    /// requests go out together; otherwise reviews wait for the game.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let api = self.api.clone();
        let result = match game_id_from_slug(&self.slug) {
            Some(id) => {
                self.scope
                    .run(async {
                        tokio::try_join!(api.game_by_slug(&self.slug), api.game_reviews(id))
                    })
                    .await?
            }
            None => {
                self.scope
                    .run(async {
                        let game = api.game_by_slug(&self.slug).await?;
                        let reviews = api.game_reviews(game.id).await?;
                        Ok::<_, ApiError>((game, reviews))
                    })
                    .await?
            }
        };

        match result {
            Ok((game, reviews)) => {
                info!(slug = %self.slug, reviews = reviews.len(), "game loaded");
                self.scope.commit(|| {
                    self.game.set(game);
                    self.reviews.set(review_items(reviews));
                })?;
                Ok(())
            }
            Err(e) => {
                warn!(slug = %self.slug, "failed to load game: {e}");
                let message = e.to_string();
                self.scope.commit(|| {
                    self.game.fail(message.clone());
                    self.reviews.fail(message);
                })?;
                Err(e)
            }
        }
    }

    /// Both rosters, for picking the best and worst player.
    pub async fn load_rosters(&mut self) -> Result<(), ApiError> {
        let game = self.loaded_game()?;
        let api = self.api.clone();
        let (home, away) = self
            .scope
            .run(async {
                tokio::try_join!(
                    api.team_roster(&game.home_team.slug),
                    api.team_roster(&game.away_team.slug)
                )
            })
            .await??;
        self.scope.commit(|| self.rosters.set(Rosters { home, away }))?;
        Ok(())
    }

    /// Create or update the user's review, then reload the review list.
    pub async fn submit_review(
        &mut self,
        form: &ReviewForm,
    ) -> Result<WriteOutcome<Review>, ApiError> {
        self.session.require_user("review games")?;
        validate_scores(&form.draft.scores)?;
        let game = self.loaded_game()?;

        let api = self.api.clone();
        let draft = &form.draft;
        let outcome = match form.editing {
            Some(review_id) => {
                write_then_refetch(
                    &self.scope,
                    &mut self.reviews,
                    api.update_review(review_id, draft),
                    || refetch_reviews(api.as_ref(), game.id),
                )
                .await?
            }
            None => {
                write_then_refetch(
                    &self.scope,
                    &mut self.reviews,
                    api.create_review(game.id, draft),
                    || refetch_reviews(api.as_ref(), game.id),
                )
                .await?
            }
        };
        info!(game = game.id, review = outcome.written().id, "review saved");
        Ok(outcome)
    }

    pub async fn delete_review(&mut self, review_id: i64) -> Result<WriteOutcome<()>, ApiError> {
        self.session.require_user("delete reviews")?;
        let game = self.loaded_game()?;
        let api = self.api.clone();
        write_then_refetch(
            &self.scope,
            &mut self.reviews,
            api.delete_review(review_id),
            || refetch_reviews(api.as_ref(), game.id),
        )
        .await
    }

    /// Optimistic like toggle on one review of this game.
    pub async fn toggle_like(&mut self, review_id: i64) -> Result<LikeState, ApiError> {
        let session = self.session.clone();
        let pending = find_item(&mut self.reviews, review_id)?.begin_like(&session)?;
        let response = pending.send(self.api.as_ref()).await;
        let reviews = &mut self.reviews;
        let outcome = self
            .scope
            .commit(|| find_item(reviews, review_id).map(|item| item.finish_like(response)))??;
        match outcome.error {
            Some(e) => Err(e),
            None => Ok(outcome.state),
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }

    fn loaded_game(&self) -> Result<Game, ApiError> {
        self.game
            .value()
            .cloned()
            .ok_or_else(|| ApiError::invalid("game", "game is not loaded"))
    }
}

impl Drop for GameDetailView {
    fn drop(&mut self) {
        self.scope.close();
    }
}

fn find_item(
    reviews: &mut ReadModel<Vec<ReviewItem>>,
    review_id: i64,
) -> Result<&mut ReviewItem, ApiError> {
    reviews
        .value_mut()
        .and_then(|items| items.iter_mut().find(|i| i.id() == review_id))
        .ok_or_else(|| {
            ApiError::invalid("review", format!("review {review_id} is not on this page"))
        })
}

async fn refetch_reviews(
    api: &dyn Backend,
    game_id: i64,
) -> Result<Vec<ReviewItem>, ApiError> {
    api.game_reviews(game_id).await.map(review_items)
}
