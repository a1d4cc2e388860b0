//! View composition and rendering.
//!
//! `compose` turns app state into exactly `height` fitted rows; `render`
//! writes them with crossterm. Composition is pure so it can be tested
//! without a terminal.

use crate::app::{FolioApp, Mode};
use crate::helpers::{fit, line_color, truncate, wrap};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use folio_core::content::Content;
use folio_core::state_machine::OverlayFocus;
use folio_core::{LineKind, OutputLine};
use folio_radar::RadarView;
use std::io::Write;

/// Radar panel height when expanded (title + summary).
pub const RADAR_PANEL_ROWS: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Accent,
    Heading,
    Muted,
    Success,
    Error,
    /// Reverse video bars.
    Inverse,
}

impl From<LineKind> for Tone {
    fn from(kind: LineKind) -> Self {
        match kind {
            LineKind::Prompt => Tone::Accent,
            LineKind::Output => Tone::Normal,
            LineKind::Success => Tone::Success,
            LineKind::Muted => Tone::Muted,
            LineKind::Error => Tone::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub tone: Tone,
}

impl Row {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new("", Tone::Normal)
    }
}

// ────────────────────────────────────────────────────────────────
// Page body
// ────────────────────────────────────────────────────────────────

/// The whole scrollable page plus the start line of each section.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub rows: Vec<Row>,
    pub offsets: Vec<usize>,
}

/// Lay out every section. A non-empty `filter` narrows the experience,
/// projects and staff lists; headings and offsets are kept for every section.
pub fn page_layout(content: &Content, width: usize, filter: &str) -> PageLayout {
    let filter = filter.trim();
    let mut rows = Vec::new();
    let mut offsets = Vec::with_capacity(content.sections.len());
    let text_width = width.saturating_sub(4).max(10);

    let para = |rows: &mut Vec<Row>, text: &str, tone: Tone| {
        for line in wrap(text, text_width) {
            rows.push(Row::new(format!("  {}", line), tone));
        }
    };

    let no_matches = |rows: &mut Vec<Row>, shown: usize| {
        if shown == 0 && !filter.is_empty() {
            rows.push(Row::new(format!("  no matches for \"{}\"", filter), Tone::Muted));
        }
    };

    for section in &content.sections {
        offsets.push(rows.len());
        rows.push(Row::new(format!("── {} ──", section.title), Tone::Heading));

        match section.id.as_str() {
            "about" => {
                let p = &content.profile;
                rows.push(Row::new(format!("  {}, {}", p.name, p.title), Tone::Accent));
                rows.push(Row::new(format!("  {}", p.location), Tone::Muted));
                para(&mut rows, &p.summary, Tone::Normal);
            }
            "impact" => {
                for m in &content.impact {
                    rows.push(Row::new(format!("  {:>8}  {}", m.value, m.label), Tone::Normal));
                }
            }
            "experience" => {
                let jobs: Vec<_> = content.experience.iter().filter(|j| j.matches(filter)).collect();
                no_matches(&mut rows, jobs.len());
                for job in jobs {
                    rows.push(Row::new(
                        format!("  {} @ {}  ({})", job.role, job.company, job.period),
                        Tone::Accent,
                    ));
                    para(&mut rows, &job.summary, Tone::Normal);
                    for h in &job.highlights {
                        para(&mut rows, &format!("• {}", h), Tone::Normal);
                    }
                }
            }
            "projects" => {
                // Numbers stay those `open <n>` takes, even when filtered.
                let projects: Vec<_> = content
                    .projects
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.matches(filter))
                    .collect();
                no_matches(&mut rows, projects.len());
                for (i, p) in projects {
                    rows.push(Row::new(format!("  {}. {}", i + 1, p.title), Tone::Accent));
                    para(&mut rows, &p.summary, Tone::Normal);
                    if !p.tech.is_empty() {
                        rows.push(Row::new(format!("     {}", p.tech.join(" · ")), Tone::Muted));
                    }
                }
            }
            "staff" => {
                let work: Vec<_> = content.staff.iter().filter(|w| w.matches(filter)).collect();
                no_matches(&mut rows, work.len());
                for w in work {
                    rows.push(Row::new(format!("  {}  [{}]", w.title, w.scope), Tone::Accent));
                    para(&mut rows, &w.summary, Tone::Normal);
                    if !w.tags.is_empty() {
                        rows.push(Row::new(format!("     {}", w.tags.join(" · ")), Tone::Muted));
                    }
                }
            }
            "skills" => {
                for s in &content.skills {
                    rows.push(Row::new(
                        format!("  {:<12} {} {:.1}", s.name, s.bar(), s.level),
                        Tone::Normal,
                    ));
                }
            }
            "education" => {
                for e in &content.education {
                    rows.push(Row::new(format!("  {}, {} ({})", e.degree, e.school, e.period), Tone::Normal));
                }
            }
            "contact" => {
                rows.push(Row::new(format!("  {:<10} {}", "email", content.profile.email), Tone::Normal));
                for l in &content.profile.links {
                    rows.push(Row::new(format!("  {:<10} {}", l.label.to_lowercase(), l.url), Tone::Normal));
                }
            }
            _ => {}
        }
        rows.push(Row::blank());
    }

    PageLayout { rows, offsets }
}

// ────────────────────────────────────────────────────────────────
// Frame composition
// ────────────────────────────────────────────────────────────────

pub fn compose(app: &FolioApp) -> Vec<Row> {
    let width = app.width as usize;
    let height = app.height as usize;
    let engine = &app.engine;
    let content = engine.content();

    let mut rows: Vec<Row> = Vec::with_capacity(height);

    // ---- Header ----
    let left = format!(" {} · {}", content.profile.name, content.profile.title);
    let right = format!("theme: {} ", engine.theme());
    let gap = width.saturating_sub(left.chars().count() + right.chars().count());
    rows.push(Row::new(format!("{}{}{}", left, " ".repeat(gap), right), Tone::Accent));

    // ---- Radar panel ----
    rows.extend(radar_rows(engine.radar(), engine.radar_collapsed()));

    // ---- Page body ----
    let body_top = rows.len();
    let body_height = app.body_height() as usize;
    let page = page_layout(content, width, &app.applied_filter);
    let scroll = engine.router().scroll();
    rows.extend(page.rows.into_iter().skip(scroll).take(body_height));
    while rows.len() < body_top + body_height {
        rows.push(Row::blank());
    }

    // ---- Status bar ----
    rows.push(status_row(app));

    // ---- Overlays, bottom-most first ----
    let mode = app.mode();
    if let Some(index) = engine.modal() {
        overlay(&mut rows, body_top, &modal_rows(content, index));
    }
    if engine.terminal_open() {
        let region = height.saturating_sub(2);
        let pane = if engine.site().overlay.is_maximized() {
            region
        } else {
            (region / 2).max(4)
        };
        let top = height.saturating_sub(1).saturating_sub(pane).max(1);
        overlay(&mut rows, top, &terminal_rows(app, pane));
    }
    if mode == Mode::Palette {
        overlay(&mut rows, 1, &palette_rows(app));
    }

    rows.truncate(height);
    rows.into_iter()
        .map(|r| Row::new(fit(&r.text, width), r.tone))
        .collect()
}

/// Replace rows starting at `top`, never touching the status bar.
fn overlay(rows: &mut [Row], top: usize, layer: &[Row]) {
    let limit = rows.len().saturating_sub(1);
    for (i, row) in layer.iter().enumerate() {
        let at = top + i;
        if at >= limit {
            break;
        }
        rows[at] = row.clone();
    }
}

fn radar_rows(view: Option<&RadarView>, collapsed: bool) -> Vec<Row> {
    if collapsed {
        let headline = view
            .map(RadarView::headline)
            .unwrap_or_else(|| "scanning…".to_string());
        return vec![Row::new(format!("▸ Ship Radar  {}  (r)", headline), Tone::Muted)];
    }

    let mut rows = vec![Row::new("▾ Ship Radar", Tone::Heading)];
    let body_rows = RADAR_PANEL_ROWS as usize - 1;
    match view {
        None => rows.push(Row::new("  scanning…", Tone::Muted)),
        Some(view) => {
            let tone = match view {
                RadarView::Failed(_) => Tone::Error,
                RadarView::Stale { .. } => Tone::Muted,
                RadarView::Live(_) => Tone::Normal,
            };
            rows.extend(
                view.summary_lines()
                    .into_iter()
                    .take(body_rows)
                    .map(|l| Row::new(format!("  {}", l), tone)),
            );
        }
    }
    rows.resize(RADAR_PANEL_ROWS as usize, Row::blank());
    rows
}

fn status_row(app: &FolioApp) -> Row {
    let engine = &app.engine;
    let active = engine
        .router()
        .active()
        .map(|s| s.title.clone())
        .unwrap_or_default();
    let sections = engine.content().sections.len();
    let seen = engine
        .content()
        .sections
        .iter()
        .filter(|s| engine.is_revealed(&s.id))
        .count();

    let hint = app.status.clone().unwrap_or_else(|| match app.mode() {
        Mode::Page if !app.applied_filter.is_empty() => {
            format!("filter \"{}\" · f edit · Ctrl+K palette · q quit", app.applied_filter)
        }
        Mode::Page => "Ctrl+K palette · ` terminal · f filter · c theme · r radar · q quit".to_string(),
        Mode::Filter => format!("filter: {}_ · Enter keep · Esc clear", app.filter),
        Mode::Modal => "Esc close".to_string(),
        Mode::Terminal => "Tab complete · ↑↓ history · F2 maximize · Esc close".to_string(),
        Mode::Palette => "↑↓ select · Enter run · Esc close".to_string(),
    });

    Row::new(
        format!(" {} │ {}/{} seen │ {}", active, seen, sections, hint),
        Tone::Inverse,
    )
}

fn modal_rows(content: &Content, index: usize) -> Vec<Row> {
    let mut rows = vec![Row::new("┌─ Project ─", Tone::Accent)];
    rows.extend(
        content
            .project_detail_lines(index)
            .into_iter()
            .map(|l| Row::new(format!("│ {}", l), Tone::Normal)),
    );
    rows.push(Row::new("└─ Esc to close", Tone::Muted));
    rows
}

fn terminal_rows(app: &FolioApp, pane: usize) -> Vec<Row> {
    let engine = &app.engine;
    let overlay = &engine.site().overlay;
    let focus = overlay.focus();

    let control = |label: &str, which: OverlayFocus| {
        if focus == Some(which) {
            format!("[›{}]", label)
        } else {
            format!("[{}]", label)
        }
    };
    let max_label = if overlay.is_maximized() { "restore" } else { "maximize" };
    let mut rows = vec![Row::new(
        format!(
            " terminal  {} {}",
            control(max_label, OverlayFocus::Maximize),
            control("close", OverlayFocus::Close)
        ),
        Tone::Inverse,
    )];

    let terminal = engine.terminal();
    let visible = pane.saturating_sub(2);
    let output: &[OutputLine] = terminal.output();
    let start = output.len().saturating_sub(visible);
    rows.extend(
        output[start..]
            .iter()
            .map(|l| Row::new(l.text.clone(), Tone::from(l.kind))),
    );
    while rows.len() < pane.saturating_sub(1) {
        rows.push(Row::blank());
    }

    let cursor = if focus == Some(OverlayFocus::Input) { "_" } else { "" };
    rows.push(Row::new(
        format!("{} {}{}", terminal.prompt(), app.input, cursor),
        Tone::Accent,
    ));
    rows
}

fn palette_rows(app: &FolioApp) -> Vec<Row> {
    let palette = app.engine.palette();
    let mut rows = vec![Row::new(format!(" ⌘ {}_", palette.query()), Tone::Inverse)];

    if palette.result_count() == 0 {
        rows.push(Row::new("   No matching actions", Tone::Muted));
    }
    for (i, action) in palette.results().enumerate() {
        let active = i == palette.active();
        let marker = if active { "▶" } else { " " };
        rows.push(Row::new(
            format!(" {} {}  · {}", marker, action.label, action.meta),
            if active { Tone::Accent } else { Tone::Normal },
        ));
    }
    rows.push(Row::new(truncate("─".repeat(40).as_str(), app.width as usize), Tone::Muted));
    rows
}

// ────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────

fn tone_color(tone: Tone, accent: Color) -> Color {
    match tone {
        Tone::Normal | Tone::Inverse => Color::Reset,
        Tone::Accent | Tone::Heading => accent,
        Tone::Muted => line_color(LineKind::Muted, accent),
        Tone::Success => line_color(LineKind::Success, accent),
        Tone::Error => line_color(LineKind::Error, accent),
    }
}

/// Paint a composed frame in the given accent color.
pub fn render<W: Write>(out: &mut W, rows: &[Row], accent: Color) -> std::io::Result<()> {
    for (y, row) in rows.iter().enumerate() {
        queue!(out, MoveTo(0, y as u16), SetForegroundColor(tone_color(row.tone, accent)))?;
        match row.tone {
            Tone::Inverse => queue!(out, SetAttribute(Attribute::Reverse))?,
            Tone::Heading => queue!(out, SetAttribute(Attribute::Bold))?,
            _ => {}
        }
        queue!(out, Print(&row.text), SetAttribute(Attribute::Reset), ResetColor)?;
    }
    out.flush()
}
