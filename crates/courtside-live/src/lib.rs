// Live box-score subscription over the game WebSocket.

pub mod backoff;
pub mod board;
pub mod subscriber;

pub use board::LiveBoard;
pub use subscriber::{game_url, subscribe, LiveError, LiveEvent, LiveStatus, LiveSubscription};
