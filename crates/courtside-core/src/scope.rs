// Per-view cancellation scope.
//
// Every fetch a view starts goes through its scope. Once the scope is closed
// (view unmounted or dropped), pending fetches resolve to `Cancelled` and no
// further state writes are committed.

use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("view scope closed")]
pub struct Cancelled;

#[derive(Clone)]
pub struct ViewScope {
    inner: Arc<Inner>,
}

struct Inner {
    label: String,
    closed: Mutex<bool>,
    signal: watch::Sender<bool>,
}

impl ViewScope {
    pub fn new(label: impl Into<String>) -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                label: label.into(),
                closed: Mutex::new(false),
                signal,
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn is_closed(&self) -> bool {
        *self.inner.closed.lock().expect("view scope mutex poisoned")
    }

    /// Close the scope. Idempotent.
    pub fn close(&self) {
        let mut closed = self.inner.closed.lock().expect("view scope mutex poisoned");
        if !*closed {
            *closed = true;
            self.inner.signal.send_replace(true);
            debug!(scope = %self.inner.label, "view scope closed");
        }
    }

    /// Drive `fut` unless the scope closes first. A closed scope never polls
    /// the future at all.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        let mut rx = self.inner.signal.subscribe();
        if *rx.borrow_and_update() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = rx.wait_for(|closed| *closed) => Err(Cancelled),
            out = fut => Ok(out),
        }
    }

    /// Apply a state write only while the scope is open. Holds the scope lock
    /// for the duration of `apply`, so a concurrent `close` either happens
    /// before (write skipped) or after (write kept).
    pub fn commit<R>(&self, apply: impl FnOnce() -> R) -> Result<R, Cancelled> {
        let closed = self.inner.closed.lock().expect("view scope mutex poisoned");
        if *closed {
            debug!(scope = %self.inner.label, "dropping write after close");
            return Err(Cancelled);
        }
        Ok(apply())
    }

    /// Spawn `fut` on the runtime, bounded by this scope.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<Result<F::Output, Cancelled>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let scope = self.clone();
        tokio::spawn(async move { scope.run(fut).await })
    }
}

impl std::fmt::Debug for ViewScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewScope")
            .field("label", &self.inner.label)
            .field("closed", &self.is_closed())
            .finish()
    }
}
