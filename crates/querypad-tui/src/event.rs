use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use querypad_client::SearchOutcome;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Events that the TUI can handle.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press, repeat or release.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick, drives the result list's hide timer.
    Tick,
    /// A dispatched search finished.
    Search(SearchOutcome),
}

impl From<SearchOutcome> for AppEvent {
    fn from(outcome: SearchOutcome) -> Self {
        Self::Search(outcome)
    }
}

/// Reads terminal events on a blocking thread and forwards them, with ticks,
/// into the UI channel.
pub struct EventHandler {
    _worker: JoinHandle<()>,
}

impl EventHandler {
    pub fn spawn(tx: UnboundedSender<AppEvent>, tick_rate: Duration) -> Self {
        let worker = thread::spawn(move || {
            loop {
                let event = match next_event(tick_rate) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "terminal event stream failed");
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        Self { _worker: worker }
    }
}

/// Block until the next event (key, mouse, resize, or tick timeout).
fn next_event(tick_rate: Duration) -> Result<AppEvent> {
    if event::poll(tick_rate)? {
        match event::read()? {
            CrosstermEvent::Key(key) => Ok(AppEvent::Key(key)),
            CrosstermEvent::Mouse(mouse) => Ok(AppEvent::Mouse(mouse)),
            CrosstermEvent::Resize(w, h) => Ok(AppEvent::Resize(w, h)),
            _ => Ok(AppEvent::Tick),
        }
    } else {
        Ok(AppEvent::Tick)
    }
}
