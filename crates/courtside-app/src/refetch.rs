// Read models that are re-fetched after every successful write.

use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use courtside_api::ApiError;
use courtside_core::scope::ViewScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    /// The last refetch failed; the value shown predates the latest write.
    Stale,
}

/// Last value fetched from the server plus how current it is.
#[derive(Debug, Clone)]
pub struct ReadModel<T> {
    value: Option<T>,
    freshness: Freshness,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl<T> Default for ReadModel<T> {
    fn default() -> Self {
        Self {
            value: None,
            freshness: Freshness::Fresh,
            loaded_at: None,
            last_error: None,
        }
    }
}

impl<T> ReadModel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
        self.freshness = Freshness::Fresh;
        self.loaded_at = Some(Utc::now());
        self.last_error = None;
    }

    /// Keep the current value but flag it as out of date.
    pub fn mark_stale(&mut self, error: impl Into<String>) {
        self.freshness = Freshness::Stale;
        self.last_error = Some(error.into());
    }

    /// A failed initial load: nothing to show, error recorded.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
        if self.value.is_some() {
            self.freshness = Freshness::Stale;
        }
    }
}

/// What happened after a write succeeded.
#[derive(Debug)]
pub enum WriteOutcome<W> {
    Refetched(W),
    /// The write went through but the follow-up read failed. The model keeps
    /// its previous value, marked stale.
    StaleAfterWrite { written: W, error: ApiError },
}

impl<W> WriteOutcome<W> {
    pub fn written(&self) -> &W {
        match self {
            WriteOutcome::Refetched(w) => w,
            WriteOutcome::StaleAfterWrite { written, .. } => written,
        }
    }

    pub fn into_written(self) -> W {
        match self {
            WriteOutcome::Refetched(w) => w,
            WriteOutcome::StaleAfterWrite { written, .. } => written,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, WriteOutcome::StaleAfterWrite { .. })
    }
}

/// Run `write`; on success re-read with `refetch` and store the result in
/// `model`. A failed write leaves `model` untouched.
///
/// The write itself is not cancelled when `scope` closes, since the server
/// may already have applied it. The refetch and every model update are
/// bounded by `scope`.
pub async fn write_then_refetch<T, W, WFut, RFut>(
    scope: &ViewScope,
    model: &mut ReadModel<T>,
    write: WFut,
    refetch: impl FnOnce() -> RFut,
) -> Result<WriteOutcome<W>, ApiError>
where
    WFut: Future<Output = Result<W, ApiError>>,
    RFut: Future<Output = Result<T, ApiError>>,
{
    let written = write.await?;
    debug!(scope = scope.label(), "write accepted, refetching");

    match scope.run(refetch()).await? {
        Ok(fresh) => {
            scope.commit(|| model.set(fresh))?;
            Ok(WriteOutcome::Refetched(written))
        }
        Err(error) => {
            warn!(scope = scope.label(), "refetch after write failed: {error}");
            let message = error.to_string();
            scope.commit(|| model.mark_stale(message))?;
            Ok(WriteOutcome::StaleAfterWrite { written, error })
        }
    }
}
