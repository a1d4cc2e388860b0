//! Keyboard dispatch.
//!
//! Maps a crossterm key event to a `Message` for the surface that has
//! focus. Pure: no app state beyond the mode is consulted.

use crate::app::Mode;
use crate::messages::Message;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn map_key(mode: Mode, key: KeyEvent) -> Option<Message> {
    // Key releases (Windows, kitty protocol) are ignored.
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // ── Global Ctrl combos ──
    if ctrl {
        return match key.code {
            KeyCode::Char('c') => Some(Message::Quit),
            KeyCode::Char('k') => Some(Message::OpenPalette),
            KeyCode::Char('l') if mode == Mode::Terminal => Some(Message::ClearScreen),
            _ => None,
        };
    }

    match mode {
        Mode::Page => page_key(key.code),
        Mode::Modal => modal_key(key.code),
        Mode::Filter => filter_key(key.code),
        Mode::Terminal => terminal_key(key.code),
        Mode::Palette => palette_key(key.code),
    }
}

fn page_key(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('/') => Some(Message::OpenPalette),
        KeyCode::Char('`') | KeyCode::Char('t') => Some(Message::OpenTerminal),
        KeyCode::Char('c') => Some(Message::CycleTheme),
        KeyCode::Char('r') => Some(Message::ToggleRadar),
        KeyCode::Char('f') => Some(Message::OpenFilter),
        KeyCode::Char('g') | KeyCode::Home => Some(Message::JumpTop),
        KeyCode::Char(d @ '1'..='9') => Some(Message::JumpSection(d as usize - '1' as usize)),
        KeyCode::Up | KeyCode::Char('k') => Some(Message::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Message::ScrollDown),
        KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PageDown),
        _ => None,
    }
}

fn modal_key(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Message::CloseModal),
        KeyCode::Char('`') => Some(Message::OpenTerminal),
        _ => None,
    }
}

fn filter_key(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Esc => Some(Message::CloseOverlay),
        KeyCode::Enter => Some(Message::Submit),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Char(c) => Some(Message::Input(c)),
        _ => None,
    }
}

fn terminal_key(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Esc => Some(Message::CloseOverlay),
        KeyCode::Enter => Some(Message::Submit),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Tab => Some(Message::TabComplete),
        KeyCode::BackTab => Some(Message::FocusPrev),
        KeyCode::Up => Some(Message::HistoryUp),
        KeyCode::Down => Some(Message::HistoryDown),
        KeyCode::F(2) => Some(Message::ToggleMaximize),
        KeyCode::Char(c) => Some(Message::Input(c)),
        _ => None,
    }
}

fn palette_key(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Esc => Some(Message::CloseOverlay),
        KeyCode::Enter => Some(Message::Submit),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Up => Some(Message::PaletteUp),
        KeyCode::Down => Some(Message::PaletteDown),
        KeyCode::Char(c) => Some(Message::Input(c)),
        _ => None,
    }
}
