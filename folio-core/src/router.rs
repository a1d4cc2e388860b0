//! Section routing for the page view: anchors, scroll offsets, the
//! active section and first-time reveal tracking.

use crate::content::Section;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Router {
    sections: Vec<Section>,
    /// Start line of each section in the rendered page. Same order as `sections`.
    offsets: Vec<usize>,
    scroll: usize,
}

impl Router {
    pub fn new(sections: Vec<Section>) -> Self {
        let offsets = vec![0; sections.len()];
        Self {
            sections,
            offsets,
            scroll: 0,
        }
    }

    /// Record where each section starts after a layout pass.
    /// Extra or missing entries are ignored / treated as 0.
    pub fn set_offsets(&mut self, offsets: &[usize]) {
        for (i, slot) in self.offsets.iter_mut().enumerate() {
            *slot = offsets.get(i).copied().unwrap_or(0);
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_to(&mut self, offset: usize) {
        self.scroll = offset;
    }

    pub fn scroll_by(&mut self, delta: isize, max: usize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Resolve `#id`, `id` or a title to a section index.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let name = name.trim().trim_start_matches('#').to_lowercase();
        self.sections
            .iter()
            .position(|s| s.id.to_lowercase() == name || s.title.to_lowercase() == name)
    }

    pub fn anchor(&self, index: usize) -> Option<String> {
        self.sections.get(index).map(|s| format!("#{}", s.id))
    }

    pub fn offset_of(&self, anchor: &str) -> Option<usize> {
        self.resolve(anchor).map(|i| self.offsets[i])
    }

    /// Jump to an anchor. Returns `false` if it names no section.
    pub fn navigate(&mut self, anchor: &str) -> bool {
        match self.offset_of(anchor) {
            Some(offset) => {
                self.scroll = offset;
                true
            }
            None => false,
        }
    }

    /// The last section whose start line is at or above the scroll offset.
    pub fn active_at(&self, offset: usize) -> Option<&Section> {
        self.offsets
            .iter()
            .rposition(|&start| start <= offset)
            .map(|i| &self.sections[i])
    }

    pub fn active(&self) -> Option<&Section> {
        self.active_at(self.scroll)
    }

    /// Sections whose start lies within `[scroll, scroll + height)`.
    pub fn visible(&self, height: usize) -> Vec<&str> {
        let end = self.scroll + height;
        self.sections
            .iter()
            .zip(&self.offsets)
            .filter(|(_, start)| **start >= self.scroll && **start < end)
            .map(|(s, _)| s.id.as_str())
            .collect()
    }
}

/// Marks sections revealed the first time they scroll into view.
#[derive(Debug, Clone, Default)]
pub struct Reveal {
    seen: HashSet<String>,
}

impl Reveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns only the ids that were not revealed before.
    pub fn observe<'a>(&mut self, visible: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        visible
            .into_iter()
            .filter(|id| self.seen.insert(id.to_string()))
            .map(str::to_string)
            .collect()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.seen.contains(id)
    }
}
