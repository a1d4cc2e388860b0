use crate::completer::Completion;
use crate::content::Content;
use crate::palette::{self, Palette, PaletteCommand};
use crate::router::{Reveal, Router};
use crate::runner::{ExecuteResult, Terminal, TerminalHost};
use crate::state_machine::Overlay;
use crate::theme::{ThemeChange, ThemeError, ThemeProvider};
use crate::vault::{Vault, KEY_RADAR_COLLAPSED};

use anyhow::{Context, Result};
use folio_radar::{RadarConfig, RadarView};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Where focus was before the terminal overlay took it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    Modal,
}

/// Page-level state the terminal is allowed to drive.
#[derive(Debug)]
pub struct Site {
    pub router: Router,
    pub theme: ThemeProvider,
    pub overlay: Overlay<Focus>,
    radar: Option<RadarView>,
    modal: Option<usize>,
    opened_url: Option<String>,
    /// Focus handed back by an `exit` typed in the terminal.
    restored: Option<Focus>,
}

impl Site {
    fn focus(&self) -> Focus {
        if self.modal.is_some() {
            Focus::Modal
        } else {
            Focus::Page
        }
    }
}

impl TerminalHost for Site {
    fn navigate(&mut self, anchor: &str) {
        if !self.router.navigate(anchor) {
            warn!("Site: no section for anchor {}", anchor);
        }
    }

    fn open_project(&mut self, index: usize) {
        self.modal = Some(index);
        // The modal now sits under the overlay; closing lands on it.
        self.overlay.retarget(Focus::Modal);
    }

    fn current_theme(&self) -> String {
        self.theme.current().to_string()
    }

    fn theme_ids(&self) -> Vec<String> {
        self.theme.ids().to_vec()
    }

    fn set_theme(&mut self, id: &str) -> Result<String, ThemeError> {
        self.theme.set(id).map(str::to_string)
    }

    fn close_terminal(&mut self) {
        self.restored = self.overlay.close();
    }

    fn open_url(&mut self, url: &str) {
        info!("Site: open {}", url);
        self.opened_url = Some(url.to_string());
    }

    fn radar(&self) -> Option<RadarView> {
        self.radar.clone()
    }
}

/// The main entry point for the Folio core.
/// The UI holds one instance of this.
#[derive(Debug)]
pub struct FolioEngine {
    content: Arc<Content>,
    vault: Vault,
    terminal: Terminal,
    site: Site,
    palette: Palette,
    reveal: Reveal,
    radar_collapsed: bool,
}

impl FolioEngine {
    /// Load content (a JSON file, or the built-in content) and open the vault at `db_path`.
    pub fn open(content_path: Option<&Path>, db_path: &Path) -> Result<Self> {
        let content = match content_path {
            Some(path) => Content::load(path)
                .with_context(|| format!("Failed to load content from {}", path.display()))?,
            None => Content::builtin().context("Built-in content is invalid")?,
        };

        let vault = Vault::open(db_path)
            .with_context(|| format!("Failed to open vault at {}", db_path.display()))?;

        Ok(Self::new(Arc::new(content), vault))
    }

    pub fn new(content: Arc<Content>, vault: Vault) -> Self {
        let theme = ThemeProvider::new(&content.themes, vault.clone());
        let site = Site {
            router: Router::new(content.sections.clone()),
            theme,
            overlay: Overlay::new(),
            radar: None,
            modal: None,
            opened_url: None,
            restored: None,
        };

        let mut terminal = Terminal::new(content.clone(), vault.clone());
        terminal.boot();

        info!(
            "Engine: session {} ({} sections, theme {})",
            vault.session_id(),
            content.sections.len(),
            site.theme.current()
        );

        Self {
            palette: Palette::new(palette::actions_from_content(&content)),
            radar_collapsed: vault.flag(KEY_RADAR_COLLAPSED),
            reveal: Reveal::new(),
            terminal,
            site,
            content,
            vault,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn site_mut(&mut self) -> &mut Site {
        &mut self.site
    }

    // ────────────────────────────────────────────────────────────────
    // Terminal overlay
    // ────────────────────────────────────────────────────────────────

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal {
        &mut self.terminal
    }

    pub fn terminal_open(&self) -> bool {
        self.site.overlay.is_open()
    }

    pub fn open_terminal(&mut self) {
        let focus = self.site.focus();
        self.site.overlay.open(focus);
    }

    /// Close the overlay and return the focus recorded when it opened.
    pub fn close_terminal(&mut self) -> Option<Focus> {
        self.terminal.reset_recall();
        self.site.overlay.close()
    }

    pub fn toggle_maximized(&mut self) {
        self.site.overlay.toggle_maximized();
    }

    /// Focus to restore after the terminal closed itself via `exit`.
    pub fn take_restored_focus(&mut self) -> Option<Focus> {
        self.site.restored.take()
    }

    /// User pressed Enter in the terminal.
    pub fn execute(&mut self, line: &str) -> ExecuteResult {
        self.terminal.execute(line, &mut self.site)
    }

    /// User pressed Tab. Returns the new input line when it changes.
    pub fn complete(&mut self, input: &str) -> Option<String> {
        match self.terminal.complete(input) {
            Completion::Fill(line) => Some(line),
            Completion::List(candidates) => {
                self.terminal.show_candidates(&candidates);
                None
            }
            Completion::None => None,
        }
    }

    // ────────────────────────────────────────────────────────────────
    // Palette
    // ────────────────────────────────────────────────────────────────

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Enter on the palette: run the active action, if any.
    pub fn palette_enter(&mut self) {
        if let Some(cmd) = self.palette.enter() {
            self.run_palette(cmd);
        }
    }

    pub fn run_palette(&mut self, cmd: PaletteCommand) {
        match cmd {
            PaletteCommand::Navigate(anchor) => self.site.navigate(&anchor),
            PaletteCommand::OpenProject(index) => self.site.open_project(index),
            PaletteCommand::SetTheme(id) => {
                if let Err(e) = self.site.theme.set(&id) {
                    warn!("Palette: {}", e);
                }
            }
            PaletteCommand::CycleTheme => {
                self.site.theme.cycle();
            }
            PaletteCommand::OpenTerminal => self.open_terminal(),
            PaletteCommand::ToggleRadar => self.toggle_radar(),
            PaletteCommand::OpenResume => {
                if let Some(url) = self.content.profile.resume_url.clone() {
                    self.site.open_url(&url);
                }
            }
        }
    }

    // ────────────────────────────────────────────────────────────────
    // Theme
    // ────────────────────────────────────────────────────────────────

    pub fn theme(&self) -> &str {
        self.site.theme.current()
    }

    pub fn theme_ids(&self) -> &[String] {
        self.site.theme.ids()
    }

    pub fn cycle_theme(&mut self) -> &str {
        self.site.theme.cycle()
    }

    pub fn subscribe_theme(&self) -> broadcast::Receiver<ThemeChange> {
        self.site.theme.subscribe()
    }

    // ────────────────────────────────────────────────────────────────
    // Page: routing, reveal, modal
    // ────────────────────────────────────────────────────────────────

    pub fn router(&self) -> &Router {
        &self.site.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.site.router
    }

    /// Mark sections visible in a viewport of `height` lines; returns the new ones.
    pub fn reveal_visible(&mut self, height: usize) -> Vec<String> {
        self.reveal.observe(self.site.router.visible(height))
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.reveal.is_revealed(id)
    }

    pub fn modal(&self) -> Option<usize> {
        self.site.modal
    }

    pub fn close_modal(&mut self) {
        self.site.modal = None;
        self.site.overlay.retarget(Focus::Page);
    }

    /// Hand focus back after the terminal closed. `Page` dismisses any modal.
    pub fn restore_focus(&mut self, focus: Focus) {
        match focus {
            Focus::Page => self.site.modal = None,
            Focus::Modal => {}
        }
    }

    /// The last URL a command asked to open, cleared on read.
    pub fn take_opened_url(&mut self) -> Option<String> {
        self.site.opened_url.take()
    }

    // ────────────────────────────────────────────────────────────────
    // Ship Radar
    // ────────────────────────────────────────────────────────────────

    pub fn radar_config(&self) -> Option<&RadarConfig> {
        self.content.radar.as_ref()
    }

    pub fn radar(&self) -> Option<&RadarView> {
        self.site.radar.as_ref()
    }

    pub fn set_radar(&mut self, view: RadarView) {
        if let RadarView::Failed(e) = &view {
            warn!("Engine: radar unavailable: {}", e);
        }
        self.site.radar = Some(view);
    }

    pub fn radar_collapsed(&self) -> bool {
        self.radar_collapsed
    }

    pub fn toggle_radar(&mut self) {
        self.radar_collapsed = !self.radar_collapsed;
        self.vault.set_flag(KEY_RADAR_COLLAPSED, self.radar_collapsed);
    }

    /// Mark the session closed in the vault.
    pub fn shutdown(&self) {
        if let Err(e) = self.vault.close_session() {
            warn!("Engine: could not close session: {}", e);
        }
    }
}
