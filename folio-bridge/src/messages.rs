//! Message enum: everything that can change the app.

use folio_core::theme::ThemeChange;
use folio_radar::RadarView;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ── Page ──
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    JumpTop,
    JumpSection(usize),
    CycleTheme,
    ToggleRadar,
    CloseModal,
    Quit,

    // ── Overlays ──
    OpenPalette,
    OpenTerminal,
    /// Start typing a filter for the page's lists.
    OpenFilter,
    /// Esc: closes whichever overlay is on top.
    CloseOverlay,

    // ── Text input (terminal line, palette query or page filter) ──
    Input(char),
    Backspace,
    Submit,

    // ── Terminal ──
    HistoryUp,
    HistoryDown,
    TabComplete,
    FocusPrev,
    ClearScreen,
    ToggleMaximize,

    // ── Palette ──
    PaletteUp,
    PaletteDown,
    /// The query debounce timer fired.
    PaletteRefresh,

    // ── Page filter ──
    /// The filter debounce timer fired.
    FilterRefresh,

    // ── Background ──
    RadarLoaded(RadarView),
    ThemeChanged(ThemeChange),
    Resized(u16, u16),
}
