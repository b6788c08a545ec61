// Review cards: optimistic likes and comment threads.

use tracing::{debug, info};

use courtside_api::{ApiError, ReviewApi, Session};
use courtside_core::models::{Comment, FeedReview, LikeReceipt, NewComment, Review};
use courtside_core::scope::ViewScope;

use crate::optimistic::{LikeState, Optimistic, Resolution, Ticket};
use crate::refetch::{write_then_refetch, ReadModel, WriteOutcome};

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

/// Like state of one review, shared by game pages and feeds.
#[derive(Debug, Clone)]
pub struct LikeCell {
    review_id: i64,
    state: Optimistic<LikeState>,
}

/// A like toggle that has been shown but not yet sent.
#[derive(Debug)]
pub struct PendingLike {
    review_id: i64,
    unlike: bool,
    ticket: Ticket,
}

/// Server answer for a `PendingLike`, ready to be folded back in.
#[derive(Debug)]
pub struct LikeResponse {
    ticket: Ticket,
    result: Result<LikeReceipt, ApiError>,
}

#[derive(Debug)]
pub struct LikeOutcome {
    pub resolution: Resolution,
    /// Visible state after the resolution.
    pub state: LikeState,
    /// Set when the op was rolled back.
    pub error: Option<ApiError>,
}

impl LikeCell {
    pub fn new(review_id: i64, liked: bool, count: u32) -> Self {
        Self {
            review_id,
            state: Optimistic::new(LikeState::new(liked, count)),
        }
    }

    pub fn review_id(&self) -> i64 {
        self.review_id
    }

    pub fn state(&self) -> LikeState {
        *self.state.value()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Flip the visible state. Anonymous users are rejected before anything
    /// changes.
    pub fn begin(&mut self, session: &Session) -> Result<PendingLike, ApiError> {
        session.require_user("like reviews")?;
        let current = self.state();
        let ticket = self.state.begin(current.toggled());
        Ok(PendingLike {
            review_id: self.review_id,
            unlike: current.liked,
            ticket,
        })
    }

    pub fn finish(&mut self, response: LikeResponse) -> LikeOutcome {
        let (resolution, error) = match response.result {
            Ok(receipt) => (self.state.confirm(response.ticket, receipt.into()), None),
            Err(e) => {
                info!(review = self.review_id, "like failed, rolling back: {e}");
                (self.state.rollback(response.ticket), Some(e))
            }
        };
        LikeOutcome {
            resolution,
            state: self.state(),
            error,
        }
    }
}

impl PendingLike {
    pub fn review_id(&self) -> i64 {
        self.review_id
    }

    /// POST (like) or DELETE (unlike), depending on what was visible when the
    /// toggle began.
    pub async fn send(self, api: &dyn ReviewApi) -> LikeResponse {
        debug!(review = self.review_id, unlike = self.unlike, "sending like toggle");
        let result = if self.unlike {
            api.unlike_review(self.review_id).await
        } else {
            api.like_review(self.review_id).await
        };
        LikeResponse {
            ticket: self.ticket,
            result,
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReviewItem {
    review: Review,
    like: LikeCell,
}

impl ReviewItem {
    pub fn new(review: Review) -> Self {
        let like = LikeCell::new(review.id, review.liked_by_me, review.likes);
        Self { review, like }
    }

    pub fn review(&self) -> &Review {
        &self.review
    }

    pub fn id(&self) -> i64 {
        self.review.id
    }

    pub fn likes(&self) -> LikeState {
        self.like.state()
    }

    pub fn like_cell(&self) -> &LikeCell {
        &self.like
    }

    pub fn begin_like(&mut self, session: &Session) -> Result<PendingLike, ApiError> {
        self.like.begin(session)
    }

    pub fn finish_like(&mut self, response: LikeResponse) -> LikeOutcome {
        self.like.finish(response)
    }

    /// Flip, send, and resolve in one go. On failure the visible state is
    /// back to what it was and the error is returned.
    pub async fn toggle_like(
        &mut self,
        api: &dyn ReviewApi,
        session: &Session,
    ) -> Result<LikeState, ApiError> {
        let pending = self.begin_like(session)?;
        let response = pending.send(api).await;
        let outcome = self.finish_like(response);
        match outcome.error {
            Some(e) => Err(e),
            None => Ok(outcome.state),
        }
    }
}

pub fn review_items(reviews: Vec<Review>) -> Vec<ReviewItem> {
    reviews.into_iter().map(ReviewItem::new).collect()
}

/// Feed entry: the review plus its like cell.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub review: FeedReview,
    pub like: LikeCell,
}

impl FeedItem {
    pub fn new(review: FeedReview) -> Self {
        let like = LikeCell::new(review.id, review.liked_by_me, review.likes);
        Self { review, like }
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CommentThread {
    review_id: i64,
    comments: ReadModel<Vec<Comment>>,
}

impl CommentThread {
    pub fn new(review_id: i64) -> Self {
        Self {
            review_id,
            comments: ReadModel::new(),
        }
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn model(&self) -> &ReadModel<Vec<Comment>> {
        &self.comments
    }

    pub async fn load(&mut self, api: &dyn ReviewApi, scope: &ViewScope) -> Result<(), ApiError> {
        match scope.run(api.comments(self.review_id)).await? {
            Ok(comments) => {
                scope.commit(|| self.comments.set(comments))?;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                scope.commit(|| self.comments.fail(message))?;
                Err(e)
            }
        }
    }

    /// Post a comment and reload the thread. Blank text is ignored and
    /// returns `Ok(None)`.
    pub async fn post(
        &mut self,
        api: &dyn ReviewApi,
        session: &Session,
        scope: &ViewScope,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<Option<WriteOutcome<Comment>>, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        session.require_user("comment on reviews")?;

        let body = NewComment {
            text: text.to_string(),
            reply_to,
        };
        let review_id = self.review_id;
        let outcome = write_then_refetch(
            scope,
            &mut self.comments,
            api.post_comment(review_id, &body),
            || api.comments(review_id),
        )
        .await?;
        Ok(Some(outcome))
    }
}
