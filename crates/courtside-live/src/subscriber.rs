// WebSocket client for `/ws/jogos/{id}`: connects, forwards every box-score
// frame as a full snapshot, and reconnects with backoff when the server drops.

use std::time::Duration;

use futures_util::stream::Stream;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};
use url::Url;

use courtside_core::config::LiveSettings;
use courtside_core::models::LiveBoxScore;

use crate::backoff::reconnect_delay;

/// Capacity of the event channel handed to the subscriber's owner.
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum LiveError {
    #[error("cannot derive live URL from {base}: {message}")]
    Url { base: String, message: String },
}

/// Connection state as seen by the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveStatus {
    Connecting,
    Connected,
    Reconnecting { attempt: u32, delay: Duration },
    /// Closed by the owner. Always the last event after `close()`.
    Disconnected,
    /// Gave up: reconnect disabled or the attempt budget is spent.
    Errored(String),
}

impl LiveStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LiveStatus::Disconnected | LiveStatus::Errored(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    Status(LiveStatus),
    Snapshot(Box<LiveBoxScore>),
    /// A text frame that did not parse. The connection stays up.
    MalformedFrame { error: String },
}

/// Why a frame pump stopped reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEnd {
    Closed,
    Failed(String),
    ReceiverGone,
}

/// `ws_base` with `/ws/jogos/{game_id}` appended.
pub fn game_url(ws_base: &Url, game_id: i64) -> Result<Url, LiveError> {
    let mut url = ws_base.clone();
    url.path_segments_mut()
        .map_err(|_| LiveError::Url {
            base: ws_base.to_string(),
            message: "base URL cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(["ws", "jogos", &game_id.to_string()]);
    Ok(url)
}

// ---------------------------------------------------------------------------
// Frame pump
// ---------------------------------------------------------------------------

/// Read raw WebSocket messages from any stream and forward each text frame as
/// a parsed snapshot (or a malformed-frame report) through `tx`.
pub async fn pump_frames<St>(mut stream: St, tx: &mpsc::Sender<LiveEvent>) -> FrameEnd
where
    St: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let event = match LiveBoxScore::from_json(text.as_str()) {
                    Ok(snapshot) => {
                        debug!(
                            game = %snapshot.game_id,
                            status = %snapshot.game_status_text,
                            "live frame"
                        );
                        LiveEvent::Snapshot(Box::new(snapshot))
                    }
                    Err(e) => {
                        warn!("malformed live frame, keeping previous snapshot: {e}");
                        LiveEvent::MalformedFrame {
                            error: e.to_string(),
                        }
                    }
                };
                if tx.send(event).await.is_err() {
                    return FrameEnd::ReceiverGone;
                }
            }
            Ok(Message::Close(_)) => {
                info!("server sent close frame");
                return FrameEnd::Closed;
            }
            Err(e) => {
                warn!("live socket error: {e}");
                return FrameEnd::Failed(e.to_string());
            }
            _ => {
                // Binary, Ping, Pong and raw frames carry no box score.
            }
        }
    }
    FrameEnd::Closed
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle to a running subscription. Dropping it closes the socket.
#[derive(Debug)]
pub struct LiveSubscription {
    url: Url,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LiveSubscription {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Close the socket and wait until `Disconnected` has been emitted.
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("live task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Start a subscription to `url` in a background task.
pub fn subscribe(
    url: Url,
    settings: LiveSettings,
) -> (LiveSubscription, mpsc::Receiver<LiveEvent>) {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(run(url.clone(), settings, tx, shutdown_rx));
    let subscription = LiveSubscription {
        url,
        shutdown: Some(shutdown_tx),
        task: Some(task),
    };
    (subscription, rx)
}

async fn emit(tx: &mpsc::Sender<LiveEvent>, status: LiveStatus) -> bool {
    tx.send(LiveEvent::Status(status)).await.is_ok()
}

async fn run(
    url: Url,
    settings: LiveSettings,
    tx: mpsc::Sender<LiveEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut attempt: u32 = 0;

    loop {
        if !emit(&tx, LiveStatus::Connecting).await {
            return;
        }

        let connected = tokio::select! {
            biased;
            _ = &mut shutdown => {
                emit(&tx, LiveStatus::Disconnected).await;
                return;
            }
            result = tokio_tungstenite::connect_async(url.as_str()) => result,
        };

        let reason = match connected {
            Ok((socket, _response)) => {
                attempt = 0;
                info!(%url, "live socket connected");
                if !emit(&tx, LiveStatus::Connected).await {
                    return;
                }

                let (mut write, read) = socket.split();
                let end = tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        if let Err(e) = write.send(Message::Close(None)).await {
                            debug!("close frame not delivered: {e}");
                        }
                        info!(%url, "live socket closed by owner");
                        emit(&tx, LiveStatus::Disconnected).await;
                        return;
                    }
                    end = pump_frames(read, &tx) => end,
                };

                match end {
                    FrameEnd::ReceiverGone => return,
                    FrameEnd::Closed => "server closed the connection".to_string(),
                    FrameEnd::Failed(e) => e,
                }
            }
            Err(e) => {
                warn!(%url, "live connect failed: {e}");
                e.to_string()
            }
        };

        if !settings.reconnect {
            emit(&tx, LiveStatus::Errored(reason)).await;
            return;
        }

        attempt += 1;
        if let Some(max) = settings.max_attempts {
            if attempt > max {
                warn!(%url, "giving up after {max} reconnect attempts");
                emit(
                    &tx,
                    LiveStatus::Errored(format!("gave up after {max} attempts: {reason}")),
                )
                .await;
                return;
            }
        }

        let delay = reconnect_delay(attempt, settings.initial_backoff, settings.max_backoff);
        info!(%url, attempt, ?delay, "reconnecting: {reason}");
        if !emit(&tx, LiveStatus::Reconnecting { attempt, delay }).await {
            return;
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                emit(&tx, LiveStatus::Disconnected).await;
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn mock_stream(
        messages: Vec<Result<Message, WsError>>,
    ) -> impl Stream<Item = Result<Message, WsError>> + Unpin {
        stream::iter(messages)
    }

    fn frame(status: &str, home_points: u32) -> String {
        serde_json::json!({
            "game_id": "0022300123",
            "game_status_text": status,
            "period": 2,
            "home_team": {"team_id": 1, "team_name": "Celtics", "team_abbreviation": "BOS",
                          "points": home_points},
            "away_team": {"team_id": 2, "team_name": "Lakers", "team_abbreviation": "LAL",
                          "points": 40}
        })
        .to_string()
    }

    #[test]
    fn game_url_appends_path() {
        let base = Url::parse("ws://localhost:8000").unwrap();
        assert_eq!(
            game_url(&base, 17).unwrap().as_str(),
            "ws://localhost:8000/ws/jogos/17"
        );

        let base = Url::parse("wss://api.example.org/v1/").unwrap();
        assert_eq!(
            game_url(&base, 3).unwrap().as_str(),
            "wss://api.example.org/v1/ws/jogos/3"
        );
    }

    #[tokio::test]
    async fn text_frames_become_snapshots_in_order() {
        let (tx, mut rx) = mpsc::channel(64);
        let messages = vec![
            Ok(Message::Text(frame("Q2 5:00", 50).into())),
            Ok(Message::Text(frame("Q2 4:30", 52).into())),
        ];

        let end = pump_frames(mock_stream(messages), &tx).await;
        assert_eq!(end, FrameEnd::Closed);

        let points: Vec<u32> = [rx.recv().await.unwrap(), rx.recv().await.unwrap()]
            .into_iter()
            .map(|event| match event {
                LiveEvent::Snapshot(s) => s.home_team.points,
                other => panic!("expected snapshot, got {other:?}"),
            })
            .collect();
        assert_eq!(points, vec![50, 52]);
    }

    #[tokio::test]
    async fn malformed_frame_is_reported_and_reading_continues() {
        let (tx, mut rx) = mpsc::channel(64);
        let messages = vec![
            Ok(Message::Text("{not json".into())),
            Ok(Message::Text(frame("Q3 1:00", 70).into())),
        ];

        pump_frames(mock_stream(messages), &tx).await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            LiveEvent::MalformedFrame { .. }
        ));
        assert!(matches!(rx.recv().await.unwrap(), LiveEvent::Snapshot(_)));
    }

    #[tokio::test]
    async fn frame_with_only_names_and_players_is_a_snapshot() {
        let (tx, mut rx) = mpsc::channel(64);
        let sparse = serde_json::json!({
            "home_team": {"team_name": "Celtics",
                          "players": [{"player_name": "J. Tatum", "points": 31,
                                       "minutes": "36:10"}]},
            "away_team": {"team_name": "Lakers",
                          "players": [{"player_name": "L. James", "points": 27}]}
        })
        .to_string();

        pump_frames(mock_stream(vec![Ok(Message::Text(sparse.into()))]), &tx).await;

        match rx.recv().await.unwrap() {
            LiveEvent::Snapshot(s) => {
                assert_eq!(s.home_team.players[0].points, 31);
                assert_eq!(s.away_team.players[0].player_name, "L. James");
                assert_eq!(s.away_team.label(), "Lakers");
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_frame_stops_reading() {
        let (tx, mut rx) = mpsc::channel(64);
        let messages = vec![
            Ok(Message::Close(None)),
            Ok(Message::Text(frame("never", 0).into())),
        ];

        assert_eq!(pump_frames(mock_stream(messages), &tx).await, FrameEnd::Closed);
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn socket_error_is_a_failure() {
        let (tx, _rx) = mpsc::channel(64);
        let messages = vec![Err(WsError::ConnectionClosed)];
        assert!(matches!(
            pump_frames(mock_stream(messages), &tx).await,
            FrameEnd::Failed(_)
        ));
    }

    #[tokio::test]
    async fn non_text_messages_are_ignored() {
        let (tx, mut rx) = mpsc::channel(64);
        let messages = vec![
            Ok(Message::Ping(vec![1].into())),
            Ok(Message::Binary(vec![0xff].into())),
        ];
        pump_frames(mock_stream(messages), &tx).await;
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropped_receiver_stops_the_pump() {
        let (tx, rx) = mpsc::channel(64);
        drop(rx);
        let messages = vec![Ok(Message::Text(frame("Q1", 2).into()))];
        assert_eq!(
            pump_frames(mock_stream(messages), &tx).await,
            FrameEnd::ReceiverGone
        );
    }

    #[tokio::test]
    async fn unreachable_server_without_reconnect_errors_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("ws://{addr}/ws/jogos/1")).unwrap();
        let settings = LiveSettings {
            reconnect: false,
            ..LiveSettings::default()
        };
        let (_sub, mut rx) = subscribe(url, settings);

        assert_eq!(
            rx.recv().await.unwrap(),
            LiveEvent::Status(LiveStatus::Connecting)
        );
        assert!(matches!(
            rx.recv().await.unwrap(),
            LiveEvent::Status(LiveStatus::Errored(_))
        ));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn attempt_budget_is_enforced() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("ws://{addr}/ws/jogos/1")).unwrap();
        let settings = LiveSettings {
            reconnect: true,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            max_attempts: Some(2),
        };
        let (_sub, mut rx) = subscribe(url, settings);

        let mut statuses = Vec::new();
        while let Some(event) = rx.recv().await {
            if let LiveEvent::Status(status) = event {
                statuses.push(status);
            }
        }

        let attempts: Vec<u32> = statuses
            .iter()
            .filter_map(|s| match s {
                LiveStatus::Reconnecting { attempt, .. } => Some(*attempt),
                _ => None,
            })
            .collect();
        assert_eq!(attempts, vec![1, 2]);
        assert!(matches!(
            statuses.last(),
            Some(LiveStatus::Errored(msg)) if msg.starts_with("gave up after 2")
        ));
    }
}
