// Two-phase optimistic updates.
//
// `begin` flips the visible value right away and remembers what it replaced.
// The server's answer then either `confirm`s the op or `rollback`s it to that
// exact snapshot. Ops are numbered; a resolution that lands while a newer op
// is still outstanding leaves the visible value alone and hands its outcome
// to the next op's snapshot, so the last op to resolve lands on server truth.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use courtside_core::models::LikeReceipt;
use tracing::{debug, warn};

// Tickets are numbered process-wide so a ticket issued by one handler can
// never match an op of another.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Handle for one outstanding op. Consumed by `confirm` or `rollback`, so an
/// op cannot be resolved twice.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an optimistic op must be confirmed or rolled back"]
pub struct Ticket {
    seq: u64,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Server value adopted.
    Confirmed,
    /// Op accepted, but a newer op is pending so the visible value was left
    /// alone.
    ConfirmedSuperseded,
    /// Visible value restored to the pre-op snapshot.
    RolledBack,
    /// Op failed while newer ops were pending. The visible value was left
    /// alone; the next op now rolls back to this op's snapshot.
    RolledBackSuperseded,
    /// Ticket belongs to another handler or was dropped by `reset`.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Optimistic<T> {
    value: T,
    pending: BTreeMap<u64, T>,
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            pending: BTreeMap::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Number of ops started but not yet resolved.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Show `tentative` immediately.
    pub fn begin(&mut self, tentative: T) -> Ticket {
        let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
        let snapshot = std::mem::replace(&mut self.value, tentative);
        self.pending.insert(seq, snapshot);
        debug!(seq, pending = self.pending.len(), "optimistic op started");
        Ticket { seq }
    }

    pub fn confirm(&mut self, ticket: Ticket, server_value: T) -> Resolution {
        if self.pending.remove(&ticket.seq).is_none() {
            warn!(seq = ticket.seq, "confirm for unknown optimistic op");
            return Resolution::Unknown;
        }
        if let Some(next) = self.next_after(ticket.seq) {
            debug!(seq = ticket.seq, "confirmation superseded by newer op");
            *next = server_value;
            return Resolution::ConfirmedSuperseded;
        }
        self.value = server_value;
        Resolution::Confirmed
    }

    /// Restore exactly what was visible before `ticket`'s op began.
    pub fn rollback(&mut self, ticket: Ticket) -> Resolution {
        let Some(snapshot) = self.pending.remove(&ticket.seq) else {
            warn!(seq = ticket.seq, "rollback for unknown optimistic op");
            return Resolution::Unknown;
        };
        match self.next_after(ticket.seq) {
            Some(next) => {
                *next = snapshot;
                warn!(
                    seq = ticket.seq,
                    pending = self.pending.len(),
                    "rolled back underneath newer optimistic ops"
                );
                Resolution::RolledBackSuperseded
            }
            None => {
                self.value = snapshot;
                Resolution::RolledBack
            }
        }
    }

    /// Replace the value with fresh server state and forget every pending op.
    pub fn reset(&mut self, value: T) {
        if !self.pending.is_empty() {
            debug!(dropped = self.pending.len(), "reset discards pending ops");
        }
        self.pending.clear();
        self.value = value;
    }

    /// Snapshot slot of the oldest op started after `seq`.
    fn next_after(&mut self, seq: u64) -> Option<&mut T> {
        self.pending.range_mut(seq + 1..).next().map(|(_, snapshot)| snapshot)
    }
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeState {
    pub liked: bool,
    pub count: u32,
}

impl LikeState {
    pub fn new(liked: bool, count: u32) -> Self {
        Self { liked, count }
    }

    /// The state a successful toggle would produce.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                count: self.count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                count: self.count + 1,
            }
        }
    }
}

impl From<LikeReceipt> for LikeState {
    fn from(receipt: LikeReceipt) -> Self {
        Self {
            liked: receipt.liked,
            count: receipt.total_likes,
        }
    }
}
