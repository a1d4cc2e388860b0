//! Terminal session and event loop.

use crate::app::FolioApp;
use crate::helpers::theme_accent;
use crate::keyboard;
use crate::messages::Message;
use crate::update;
use crate::view_ui;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, ExecutableCommand};
use folio_radar::RadarView;
use futures::StreamExt;
use std::io::{stdout, BufWriter, Write};
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, warn};

// ════════════════════════════════════════════════════════════════════
// Raw-mode guard
// ════════════════════════════════════════════════════════════════════

/// Owns raw mode and the alternate screen. Dropping it restores the terminal,
/// including on early return through `?`.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        out.execute(cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(LeaveAlternateScreen);
        if let Err(e) = terminal::disable_raw_mode() {
            error!("Shell: could not leave raw mode: {}", e);
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Event loop
// ════════════════════════════════════════════════════════════════════

/// Run until the user quits. Redraws after every handled event.
pub async fn run(app: &mut FolioApp, mut radar_rx: mpsc::Receiver<RadarView>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut out = BufWriter::new(stdout());

    if let Ok((width, height)) = terminal::size() {
        update::update(app, Message::Resized(width, height), Instant::now());
    }

    let mut theme_rx = app.engine.subscribe_theme();
    let mut radar_open = true;
    let mut events = EventStream::new();

    draw(app, &mut out)?;

    while !app.should_quit {
        let deadline = app.next_deadline();
        let debounce = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => handle_event(app, event),
                Some(Err(e)) => {
                    warn!("Shell: input error: {}", e);
                    continue;
                }
                None => break,
            },

            view = radar_rx.recv(), if radar_open => match view {
                Some(view) => update::update(app, Message::RadarLoaded(view), Instant::now()),
                None => {
                    radar_open = false;
                    continue;
                }
            },

            change = theme_rx.recv() => match change {
                Ok(change) => update::update(app, Message::ThemeChanged(change), Instant::now()),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!("Shell: skipped {} theme notifications", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },

            _ = debounce => update::tick(app, Instant::now()),
        }

        draw(app, &mut out)?;
    }

    Ok(())
}

fn handle_event(app: &mut FolioApp, event: Event) {
    let message = match event {
        Event::Key(key) => keyboard::map_key(app.mode(), key),
        Event::Resize(width, height) => Some(Message::Resized(width, height)),
        _ => None,
    };

    if let Some(message) = message {
        update::update(app, message, Instant::now());
    }
}

fn draw<W: Write>(app: &FolioApp, out: &mut W) -> Result<()> {
    let rows = view_ui::compose(app);
    let accent = theme_accent(app.engine.theme_ids(), app.engine.theme());
    view_ui::render(out, &rows, accent).context("Failed to draw frame")
}
