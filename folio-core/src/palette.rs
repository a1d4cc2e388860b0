//! Command palette: a static action list filtered by a token-count score.

use crate::content::Content;

/// Keep at most this many results.
pub const MAX_RESULTS: usize = 10;

/// What running a palette action asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteCommand {
    Navigate(String),
    OpenProject(usize),
    SetTheme(String),
    CycleTheme,
    OpenTerminal,
    ToggleRadar,
    OpenResume,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteAction {
    pub label: String,
    pub meta: String,
    pub keywords: String,
    pub run: PaletteCommand,
}

impl PaletteAction {
    fn new(label: impl Into<String>, meta: &str, keywords: &str, run: PaletteCommand) -> Self {
        Self {
            label: label.into(),
            meta: meta.to_string(),
            keywords: keywords.to_string(),
            run,
        }
    }

    /// Number of query tokens found in `label + meta + keywords`.
    pub fn score(&self, query: &str) -> usize {
        let haystack = format!("{} {} {}", self.label, self.meta, self.keywords).to_lowercase();
        query
            .to_lowercase()
            .split_whitespace()
            .filter(|token| haystack.contains(token))
            .count()
    }
}

/// Build every action the palette offers, in display order.
pub fn actions_from_content(content: &Content) -> Vec<PaletteAction> {
    let mut actions: Vec<PaletteAction> = content
        .sections
        .iter()
        .map(|s| {
            PaletteAction::new(
                format!("Go to {}", s.title),
                "Section",
                &format!("navigate jump {}", s.id),
                PaletteCommand::Navigate(format!("#{}", s.id)),
            )
        })
        .collect();

    actions.extend(content.projects.iter().enumerate().map(|(i, p)| {
        PaletteAction::new(
            format!("Open {}", p.title),
            "Project",
            &p.tech.join(" "),
            PaletteCommand::OpenProject(i),
        )
    }));

    actions.extend(content.themes.ids.iter().map(|id| {
        let mut title = id.clone();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        PaletteAction::new(
            format!("Theme {}", title),
            "Appearance",
            "color colour",
            PaletteCommand::SetTheme(id.clone()),
        )
    }));

    actions.extend([
        PaletteAction::new(
            "Cycle theme",
            "Appearance",
            "next color",
            PaletteCommand::CycleTheme,
        ),
        PaletteAction::new(
            "Open terminal",
            "Tools",
            "shell console cli",
            PaletteCommand::OpenTerminal,
        ),
        PaletteAction::new(
            "Toggle Ship Radar",
            "Tools",
            "github deploy ci",
            PaletteCommand::ToggleRadar,
        ),
        PaletteAction::new("Open résumé", "Profile", "resume cv", PaletteCommand::OpenResume),
    ]);
    actions
}

/// Indices of `actions` matching `query`, best first, stable on ties.
pub fn filter(actions: &[PaletteAction], query: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..actions.len().min(MAX_RESULTS)).collect();
    }

    let mut scored: Vec<(usize, usize)> = actions
        .iter()
        .enumerate()
        .map(|(i, a)| (i, a.score(query)))
        .filter(|(_, score)| *score > 0)
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().take(MAX_RESULTS).map(|(i, _)| i).collect()
}

#[derive(Debug, Clone)]
pub struct Palette {
    actions: Vec<PaletteAction>,
    query: String,
    results: Vec<usize>,
    active: usize,
    open: bool,
}

impl Palette {
    pub fn new(actions: Vec<PaletteAction>) -> Self {
        let results = filter(&actions, "");
        Self {
            actions,
            query: String::new(),
            results,
            active: 0,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.set_query("");
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Update the query text without re-filtering (see `refresh`).
    pub fn edit_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Re-filter against the current query and reset the selection.
    pub fn refresh(&mut self) {
        self.results = filter(&self.actions, &self.query);
        self.active = 0;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.edit_query(query);
        self.refresh();
    }

    pub fn results(&self) -> impl Iterator<Item = &PaletteAction> {
        self.results.iter().map(|&i| &self.actions[i])
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn move_up(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.active + 1 < self.results.len() {
            self.active += 1;
        }
    }

    /// Close and hand back the active action's command, if any.
    pub fn enter(&mut self) -> Option<PaletteCommand> {
        let picked = self
            .results
            .get(self.active)
            .map(|&i| self.actions[i].run.clone());
        self.escape();
        picked
    }

    pub fn escape(&mut self) {
        self.open = false;
        self.query.clear();
        self.active = 0;
    }
}
