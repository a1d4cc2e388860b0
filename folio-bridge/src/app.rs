//! Application state.

use crate::view_ui;

use folio_core::content::Content;
use folio_core::debounce::Debounce;
use folio_core::vault::Vault;
use folio_core::FolioEngine;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Palette re-filters this long after the last keystroke.
pub const PALETTE_DEBOUNCE: Duration = Duration::from_millis(120);

/// Page lists re-filter this long after the last keystroke.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(120);

/// Lines reserved above and below the page body (header, status bar).
pub const CHROME_LINES: u16 = 2;

/// Which surface receives keys. Derived from engine state, top-most wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Page,
    Modal,
    /// Typing into the page list filter.
    Filter,
    Terminal,
    Palette,
}

#[derive(Debug)]
pub struct FolioApp {
    pub engine: FolioEngine,
    /// Terminal input line.
    pub input: String,
    pub palette_debounce: Debounce,
    /// Page list filter as typed.
    pub filter: String,
    /// Filter the page is currently laid out with.
    pub applied_filter: String,
    pub filter_editing: bool,
    pub filter_debounce: Debounce,
    pub width: u16,
    pub height: u16,
    /// Total page rows at the current width.
    pub page_len: usize,
    /// One-shot notice shown in the status bar.
    pub status: Option<String>,
    pub should_quit: bool,
}

impl FolioApp {
    pub fn new(content: Arc<Content>, vault: Vault) -> Self {
        Self::with_engine(FolioEngine::new(content, vault))
    }

    pub fn with_engine(engine: FolioEngine) -> Self {
        let mut app = Self {
            engine,
            input: String::new(),
            palette_debounce: Debounce::new(PALETTE_DEBOUNCE),
            filter: String::new(),
            applied_filter: String::new(),
            filter_editing: false,
            filter_debounce: Debounce::new(FILTER_DEBOUNCE),
            width: 80,
            height: 24,
            page_len: 0,
            status: None,
            should_quit: false,
        };
        app.relayout();
        app
    }

    /// Recompute section offsets for the current width and reveal what is on screen.
    pub fn relayout(&mut self) {
        let layout = view_ui::page_layout(
            self.engine.content(),
            self.width as usize,
            &self.applied_filter,
        );
        self.page_len = layout.rows.len();
        self.engine.router_mut().set_offsets(&layout.offsets);
        self.reveal();
    }

    /// Mark sections in the viewport as seen.
    pub fn reveal(&mut self) {
        let height = self.body_height() as usize;
        for id in self.engine.reveal_visible(height) {
            debug!("Page: revealed #{}", id);
        }
    }

    /// Largest useful scroll offset.
    pub fn max_scroll(&self) -> usize {
        self.page_len.saturating_sub(self.body_height() as usize)
    }

    pub fn mode(&self) -> Mode {
        if self.engine.palette().is_open() {
            Mode::Palette
        } else if self.engine.terminal_open() {
            Mode::Terminal
        } else if self.filter_editing {
            Mode::Filter
        } else if self.engine.modal().is_some() {
            Mode::Modal
        } else {
            Mode::Page
        }
    }

    /// Lay the page out again with whatever has been typed into the filter.
    pub fn apply_filter(&mut self) {
        self.filter_debounce.cancel();
        if self.applied_filter != self.filter {
            debug!("Page: filter {:?}", self.filter);
            self.applied_filter = self.filter.clone();
            self.relayout();
        }
    }

    /// Earliest pending debounce deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.palette_debounce.deadline(), self.filter_debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Rows the radar panel takes above the page body.
    pub fn radar_rows(&self) -> u16 {
        if self.engine.radar_collapsed() {
            1
        } else {
            view_ui::RADAR_PANEL_ROWS
        }
    }

    /// Rows available to the scrolling page body.
    pub fn body_height(&self) -> u16 {
        self.height
            .saturating_sub(CHROME_LINES)
            .saturating_sub(self.radar_rows())
            .max(1)
    }
}
