//! Terminal setup and the main loop.

use crate::{AdminBackend, App, Event, EventHandler, controller};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use storefront_error::{TuiError, TuiErrorKind, TuiResult};
use tracing::info;

/// Timing knobs for the admin UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminOptions {
    /// How often timers are checked when no key is pressed
    pub tick_rate: Duration,
    /// Quiet period before search input is applied
    pub debounce: Duration,
    /// How long alerts stay on screen
    pub alert_duration: Duration,
}

impl Default for AdminOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
            debounce: crate::DEFAULT_DEBOUNCE,
            alert_duration: crate::DEFAULT_ALERT_DURATION,
        }
    }
}

type AdminTerminal = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> TuiResult<AdminTerminal> {
    enable_raw_mode().map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalSetup(format!(
            "Failed to enable raw mode: {}",
            e
        )))
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalSetup(format!(
            "Failed to setup terminal: {}",
            e
        )))
    })?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalSetup(format!(
            "Failed to create terminal: {}",
            e
        )))
    })
}

fn restore_terminal(terminal: &mut AdminTerminal) -> TuiResult<()> {
    disable_raw_mode().map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalRestore(format!(
            "Failed to disable raw mode: {}",
            e
        )))
    })?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalRestore(format!(
            "Failed to cleanup terminal: {}",
            e
        )))
    })?;
    terminal.show_cursor().map_err(|e| {
        TuiError::new(TuiErrorKind::TerminalRestore(format!(
            "Failed to show cursor: {}",
            e
        )))
    })
}

/// Run the admin UI against `backend` until the user quits.
///
/// The terminal is restored even when the loop fails.
pub async fn run_admin(backend: &dyn AdminBackend, options: AdminOptions) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let result = main_loop(&mut terminal, backend, options).await;
    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

async fn main_loop(
    terminal: &mut AdminTerminal,
    backend: &dyn AdminBackend,
    options: AdminOptions,
) -> TuiResult<()> {
    let mut app = App::new(options.debounce, options.alert_duration);
    let events = EventHandler::new(options.tick_rate);
    info!("Admin UI started");

    while !app.should_quit {
        let now = Instant::now();
        app.tick(now);

        controller::refresh(&mut app, backend, now).await;
        terminal
            .draw(|f| crate::ui::draw(f, &app))
            .map_err(|e| TuiError::new(TuiErrorKind::Rendering(format!("Failed to draw: {}", e))))?;

        if let Some(Event::Key(key)) = events.next()?
            && let Some(action) = app.handle_key(key, Instant::now())
        {
            controller::perform(&mut app, backend, action, Instant::now()).await;
        }
    }

    info!("Admin UI stopped");
    Ok(())
}
