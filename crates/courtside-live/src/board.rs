// What the live screen shows: the connection status and the latest snapshot.

use courtside_core::models::LiveBoxScore;

use crate::subscriber::{LiveEvent, LiveStatus};

#[derive(Debug, Clone)]
pub struct LiveBoard {
    pub status: LiveStatus,
    pub snapshot: Option<LiveBoxScore>,
    pub frames_received: u64,
    pub malformed_frames: u64,
    pub last_error: Option<String>,
}

impl Default for LiveBoard {
    fn default() -> Self {
        Self {
            status: LiveStatus::Connecting,
            snapshot: None,
            frames_received: 0,
            malformed_frames: 0,
            last_error: None,
        }
    }
}

impl LiveBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one subscriber event into the board. A snapshot replaces the
    /// previous one wholesale.
    pub fn apply(&mut self, event: LiveEvent) {
        match event {
            LiveEvent::Status(status) => {
                if let LiveStatus::Errored(reason) = &status {
                    self.last_error = Some(reason.clone());
                }
                self.status = status;
            }
            LiveEvent::Snapshot(snapshot) => {
                self.snapshot = Some(*snapshot);
                self.frames_received += 1;
            }
            LiveEvent::MalformedFrame { error } => {
                self.malformed_frames += 1;
                self.last_error = Some(error);
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == LiveStatus::Connected
    }
}
