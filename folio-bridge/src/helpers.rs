//! Shared utility functions.
//!
//! Zero terminal I/O. Used by both the view and the update loop.

use crossterm::style::Color;
use folio_core::LineKind;

// ────────────────────────────────────────────────────────────────
// Theme colors
// ────────────────────────────────────────────────────────────────

const ACCENTS: [Color; 5] = [
    Color::Cyan,
    Color::DarkBlue,
    Color::DarkYellow,
    Color::Magenta,
    Color::Green,
];

/// Accent color for a theme, by its position in the configured list.
/// Ids not in the list get the first accent.
pub fn theme_accent(ids: &[String], theme: &str) -> Color {
    let idx = ids.iter().position(|id| id == theme).unwrap_or(0);
    ACCENTS[idx % ACCENTS.len()]
}

pub fn line_color(kind: LineKind, accent: Color) -> Color {
    match kind {
        LineKind::Prompt => accent,
        LineKind::Output => Color::Reset,
        LineKind::Success => Color::Green,
        LineKind::Muted => Color::DarkGrey,
        LineKind::Error => Color::Red,
    }
}

// ────────────────────────────────────────────────────────────────
// Text fitting
// ────────────────────────────────────────────────────────────────

/// Cut to `width` chars, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Truncate, then right-pad with spaces to exactly `width` chars.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Greedy word wrap. Words longer than `width` are hard-split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
