//! Update logic: the central message handler.
//!
//! All state changes go through `update`. Time is passed in so the
//! palette debounce can be driven from tests.

use crate::app::{FolioApp, Mode};
use crate::messages::Message;

use folio_core::engine::Focus;
use folio_core::state_machine::OverlayFocus;
use folio_core::ExecuteResult;

use std::time::Instant;
use tracing::{debug, info};

pub fn update(app: &mut FolioApp, message: Message, now: Instant) {
    // Notices last until the next user action.
    if !matches!(
        message,
        Message::RadarLoaded(_)
            | Message::ThemeChanged(_)
            | Message::PaletteRefresh
            | Message::FilterRefresh
    ) {
        app.status = None;
    }

    match message {
        // ────────────────────────────────────────────────────
        // Page
        // ────────────────────────────────────────────────────
        Message::ScrollUp => scroll(app, -1),
        Message::ScrollDown => scroll(app, 1),
        Message::PageUp => scroll(app, -(app.body_height() as isize)),
        Message::PageDown => scroll(app, app.body_height() as isize),
        Message::JumpTop => {
            app.engine.router_mut().scroll_to(0);
            app.reveal();
        }
        Message::JumpSection(index) => {
            if let Some(anchor) = app.engine.router().anchor(index) {
                app.engine.router_mut().navigate(&anchor);
                clamp_scroll(app);
                app.reveal();
            }
        }
        Message::CycleTheme => {
            app.engine.cycle_theme();
        }
        Message::ToggleRadar => {
            app.engine.toggle_radar();
            clamp_scroll(app);
            app.reveal();
        }
        Message::CloseModal => app.engine.close_modal(),
        Message::Quit => {
            info!("UI: quit requested");
            app.should_quit = true;
        }

        // ────────────────────────────────────────────────────
        // Overlays
        // ────────────────────────────────────────────────────
        Message::OpenPalette => {
            app.engine.palette_mut().open();
            app.palette_debounce.cancel();
        }
        Message::OpenTerminal => app.engine.open_terminal(),
        Message::OpenFilter => {
            app.filter_editing = true;
        }
        Message::CloseOverlay => match app.mode() {
            Mode::Palette => {
                app.engine.palette_mut().escape();
                app.palette_debounce.cancel();
            }
            Mode::Terminal => {
                let restored = app.engine.close_terminal();
                restore(app, restored);
            }
            Mode::Filter => {
                // Esc drops the filter entirely.
                app.filter_editing = false;
                app.filter.clear();
                app.apply_filter();
                clamp_scroll(app);
            }
            Mode::Modal => app.engine.close_modal(),
            Mode::Page => {}
        },

        // ────────────────────────────────────────────────────
        // Text input
        // ────────────────────────────────────────────────────
        Message::Input(c) => match app.mode() {
            Mode::Palette => {
                let mut query = app.engine.palette().query().to_string();
                query.push(c);
                app.engine.palette_mut().edit_query(query);
                app.palette_debounce.touch(now);
            }
            Mode::Terminal => {
                if terminal_focus(app) == Some(OverlayFocus::Input) {
                    app.input.push(c);
                }
            }
            Mode::Filter => {
                app.filter.push(c);
                app.filter_debounce.touch(now);
            }
            _ => {}
        },
        Message::Backspace => match app.mode() {
            Mode::Palette => {
                let mut query = app.engine.palette().query().to_string();
                query.pop();
                app.engine.palette_mut().edit_query(query);
                app.palette_debounce.touch(now);
            }
            Mode::Terminal => {
                app.input.pop();
            }
            Mode::Filter => {
                app.filter.pop();
                app.filter_debounce.touch(now);
            }
            _ => {}
        },
        Message::Submit => match app.mode() {
            Mode::Palette => {
                // Enter acts on what the user typed, not a stale filter.
                if app.palette_debounce.is_pending() {
                    app.palette_debounce.cancel();
                    app.engine.palette_mut().refresh();
                }
                app.engine.palette_enter();
                after_side_effects(app);
            }
            Mode::Terminal => submit_terminal(app),
            Mode::Filter => {
                app.filter_editing = false;
                app.apply_filter();
                clamp_scroll(app);
                app.reveal();
            }
            _ => {}
        },

        // ────────────────────────────────────────────────────
        // Terminal
        // ────────────────────────────────────────────────────
        Message::HistoryUp => {
            if let Some(entry) = app.engine.terminal_mut().recall_up() {
                app.input = entry;
            }
        }
        Message::HistoryDown => {
            if let Some(entry) = app.engine.terminal_mut().recall_down() {
                app.input = entry;
            }
        }
        Message::TabComplete => {
            if terminal_focus(app) == Some(OverlayFocus::Input) {
                let input = app.input.clone();
                if let Some(filled) = app.engine.complete(&input) {
                    app.input = filled;
                }
            } else {
                app.engine.site_mut().overlay.focus_next();
            }
        }
        Message::FocusPrev => app.engine.site_mut().overlay.focus_prev(),
        Message::ClearScreen => app.engine.terminal_mut().clear(),
        Message::ToggleMaximize => app.engine.toggle_maximized(),

        // ────────────────────────────────────────────────────
        // Palette
        // ────────────────────────────────────────────────────
        Message::PaletteUp => app.engine.palette_mut().move_up(),
        Message::PaletteDown => app.engine.palette_mut().move_down(),
        Message::PaletteRefresh => app.engine.palette_mut().refresh(),

        // ────────────────────────────────────────────────────
        // Page filter
        // ────────────────────────────────────────────────────
        Message::FilterRefresh => {
            app.apply_filter();
            clamp_scroll(app);
        }

        // ────────────────────────────────────────────────────
        // Background
        // ────────────────────────────────────────────────────
        Message::RadarLoaded(view) => {
            info!("UI: radar loaded ({})", view.headline());
            app.engine.set_radar(view);
        }
        Message::ThemeChanged(change) => {
            app.status = Some(format!("Theme: {} → {}", change.from, change.to));
        }
        Message::Resized(width, height) => {
            app.width = width;
            app.height = height;
            app.relayout();
            clamp_scroll(app);
        }
    }
}

/// Fire any refresh whose debounce deadline has passed.
pub fn tick(app: &mut FolioApp, now: Instant) {
    if app.palette_debounce.poll(now) {
        update(app, Message::PaletteRefresh, now);
    }
    if app.filter_debounce.poll(now) {
        update(app, Message::FilterRefresh, now);
    }
}

fn terminal_focus(app: &FolioApp) -> Option<OverlayFocus> {
    app.engine.site().overlay.focus()
}

fn submit_terminal(app: &mut FolioApp) {
    match terminal_focus(app) {
        Some(OverlayFocus::Maximize) => {
            app.engine.toggle_maximized();
            return;
        }
        Some(OverlayFocus::Close) => {
            let restored = app.engine.close_terminal();
            restore(app, restored);
            return;
        }
        _ => {}
    }

    let line = std::mem::take(&mut app.input);
    if app.engine.execute(&line) == ExecuteResult::Exit {
        let restored = app.engine.take_restored_focus();
        restore(app, restored);
    }
    after_side_effects(app);
}

/// Apply the focus the terminal recorded when it opened.
fn restore(app: &mut FolioApp, restored: Option<Focus>) {
    debug!("UI: terminal closed, focus back to {:?}", restored);
    if let Some(focus) = restored {
        app.engine.restore_focus(focus);
    }
}

/// Pick up anything a command or palette action asked the page to do.
fn after_side_effects(app: &mut FolioApp) {
    if let Some(url) = app.engine.take_opened_url() {
        app.status = Some(format!("Open in your browser: {}", url));
    }
    clamp_scroll(app);
    app.reveal();
}

fn scroll(app: &mut FolioApp, delta: isize) {
    let max = app.max_scroll();
    app.engine.router_mut().scroll_by(delta, max);
    app.reveal();
}

fn clamp_scroll(app: &mut FolioApp) {
    let max = app.max_scroll();
    if app.engine.router().scroll() > max {
        app.engine.router_mut().scroll_to(max);
    }
}
