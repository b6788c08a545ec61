// Live box-score screen.
//
// The subscriber pushes `LiveEvent`s over an mpsc channel; the screen folds
// them into a `LiveBoard` and re-renders at ~30 fps until the user quits.

pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info};

use courtside_live::{LiveBoard, LiveEvent, LiveSubscription};

use layout::build_layout;

// ---------------------------------------------------------------------------
// LiveScreen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LiveScreen {
    pub game_id: i64,
    pub board: LiveBoard,
}

impl LiveScreen {
    pub fn new(game_id: i64) -> Self {
        Self {
            game_id,
            board: LiveBoard::new(),
        }
    }

    pub fn apply(&mut self, event: LiveEvent) {
        self.board.apply(event);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, screen: &LiveScreen) {
    let layout = build_layout(frame.area());
    let snapshot = screen.board.snapshot.as_ref();

    widgets::status_bar::render(frame, layout.status_bar, &screen.board, screen.game_id);
    widgets::scoreboard::render(frame, layout.scoreboard, snapshot);
    widgets::box_score::render(frame, layout.away_box, snapshot.map(|s| &s.away_team));
    widgets::box_score::render(frame, layout.home_box, snapshot.map(|s| &s.home_team));
    widgets::plays::render(frame, layout.plays, snapshot);
    render_help_bar(frame, layout.help_bar, screen);
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, screen: &LiveScreen) {
    let text = match &screen.board.last_error {
        Some(error) => format!(" q:Quit | last error: {error}"),
        None => " q:Quit".to_string(),
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

/// Run the live screen until the user quits, then close the subscription.
/// Returns the final board.
pub async fn run(
    game_id: i64,
    subscription: LiveSubscription,
    mut events: mpsc::Receiver<LiveEvent>,
) -> anyhow::Result<LiveBoard> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut screen = LiveScreen::new(game_id);
    let mut event_stream = EventStream::new();
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut feed_open = true;

    info!(game = game_id, url = %subscription.url(), "live screen started");

    let outcome = loop {
        tokio::select! {
            event = events.recv(), if feed_open => {
                match event {
                    Some(event) => screen.apply(event),
                    None => {
                        // Subscriber finished; keep the last board on screen.
                        debug!("live feed ended");
                        feed_open = false;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if is_quit_key(&key) => break Ok(()),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        break Err(anyhow::Error::from(e).context("terminal input failed"))
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &screen)) {
                    break Err(anyhow::Error::from(e).context("failed to draw live screen"));
                }
            }
        }
    };

    ratatui::restore();
    subscription.close().await;
    info!(
        game = game_id,
        updates = screen.board.frames_received,
        "live screen closed"
    );
    outcome.map(|()| screen.board)
}
