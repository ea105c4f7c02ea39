//! Event handling for the admin UI.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use storefront_error::{TuiError, TuiErrorKind, TuiResult};

/// Event types for the admin UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Tick event for timers (debounce, alert expiry, pending loads)
    Tick,
    /// Key press event
    Key(KeyEvent),
}

/// Event handler that polls for terminal events.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler that ticks every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Get the next event, blocking until an event is available or timeout.
    pub fn next(&self) -> TuiResult<Option<Event>> {
        if event::poll(self.tick_rate)
            .map_err(|e| TuiError::new(TuiErrorKind::Input(e.to_string())))?
        {
            match event::read().map_err(|e| TuiError::new(TuiErrorKind::Input(e.to_string())))? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(Event::Key(key))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(Event::Tick))
        }
    }
}
