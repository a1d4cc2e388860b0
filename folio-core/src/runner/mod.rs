use crate::builtins::{self, Context};
use crate::commands;
use crate::completer::{self, Completion, CompletionDomains};
use crate::content::Content;
use crate::history::{CommandHistory, HISTORY_LIMIT};
use crate::runtime::parser::CommandParser;
use crate::theme::ThemeError;
use crate::vault::{Vault, KEY_BOOT_SEEN};
use crate::{LineKind, OutputLine};

use folio_radar::RadarView;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of executing a line. Tells the UI what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteResult {
    /// Blank input. Nothing echoed, nothing stored.
    Ignored,
    /// Command ran and appended its output.
    Handled,
    /// Bad input: exactly one error line was appended.
    Failed,
    /// Scrollback was emptied.
    ClearScreen,
    /// The overlay should close.
    Exit,
}

/// The page-level side effects a command may ask for.
pub trait TerminalHost {
    /// Scroll to an anchor like `#projects`.
    fn navigate(&mut self, anchor: &str);
    /// Open the detail modal for a project (0-based).
    fn open_project(&mut self, index: usize);
    fn current_theme(&self) -> String;
    fn theme_ids(&self) -> Vec<String>;
    /// Returns the canonical id that was applied.
    fn set_theme(&mut self, id: &str) -> Result<String, ThemeError>;
    fn close_terminal(&mut self);
    fn open_url(&mut self, url: &str);
    /// `None` while the first fetch is still in flight.
    fn radar(&self) -> Option<RadarView>;
}

#[derive(Debug)]
pub struct Terminal {
    content: Arc<Content>,
    vault: Vault,
    history: CommandHistory,
    domains: CompletionDomains,
    output: Vec<OutputLine>,
    prompt: String,
}

impl Terminal {
    /// Build a terminal, restoring history from the vault.
    pub fn new(content: Arc<Content>, vault: Vault) -> Self {
        let stored = match vault.load_history(HISTORY_LIMIT) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Terminal: could not restore history: {}", e);
                Vec::new()
            }
        };

        let user = content
            .profile
            .name
            .split_whitespace()
            .next()
            .unwrap_or("guest")
            .to_lowercase();

        Self {
            domains: CompletionDomains::from_content(&content),
            prompt: format!("{}@folio:~$", user),
            history: CommandHistory::from_entries(stored),
            output: Vec::new(),
            content,
            vault,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn output(&self) -> &[OutputLine] {
        &self.output
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Print the greeting. The long banner only shows on the very first start.
    pub fn boot(&mut self) {
        if self.vault.flag(KEY_BOOT_SEEN) {
            self.output.push(OutputLine::muted(
                "Welcome back. Type `help` for commands.",
            ));
            return;
        }

        let p = &self.content.profile;
        self.output.extend([
            OutputLine::muted("folio: booting…"),
            OutputLine::muted(format!("  content   {} sections", self.content.sections.len())),
            OutputLine::muted(format!("  history   {} entries", self.history.len())),
            OutputLine::success(format!("{}, {}", p.name, p.title)),
            OutputLine::output("Type `help` to see what this terminal can do."),
        ]);
        self.vault.set_flag(KEY_BOOT_SEEN, true);
    }

    /// Run one line of user input.
    pub fn execute(&mut self, raw: &str, host: &mut dyn TerminalHost) -> ExecuteResult {
        // Any submit, even one that fails expansion, starts recall from the newest entry.
        self.history.reset_cursor();

        let line = raw.trim();
        if line.is_empty() {
            return ExecuteResult::Ignored;
        }

        // ---- History expansion ----
        let line = match CommandParser::expand(line, &self.history).into_line() {
            Ok(line) => line,
            Err(msg) => {
                self.output.push(OutputLine::error(msg));
                return ExecuteResult::Failed;
            }
        };

        self.output.push(OutputLine::new(
            LineKind::Prompt,
            format!("{} {}", self.prompt, line),
        ));
        self.remember(&line);

        // ---- Parse and route ----
        let Some(parsed) = CommandParser::parse(&line) else {
            return ExecuteResult::Ignored;
        };
        let Some(def) = commands::lookup(&parsed.name) else {
            let token = line.split_whitespace().next().unwrap_or_default();
            self.output.push(OutputLine::error(format!(
                "Unknown command: {}. Type 'help' for available commands.",
                token
            )));
            return ExecuteResult::Failed;
        };

        debug!("Terminal: {} {:?}", def.cmd, parsed.args());

        let mut ctx = Context {
            content: &self.content,
            history: &self.history,
            host,
        };
        let reply = builtins::dispatch(def, parsed.args(), &mut ctx);

        match reply.result {
            ExecuteResult::ClearScreen => self.output.clear(),
            _ => self.output.extend(reply.lines),
        }
        reply.result
    }

    fn remember(&mut self, line: &str) {
        self.history.push(line);
        if let Err(e) = self.vault.append_history(line, HISTORY_LIMIT) {
            warn!("Terminal: could not persist history: {}", e);
        }
    }

    pub fn complete(&self, input: &str) -> Completion {
        completer::complete(input, &self.domains)
    }

    /// Show a candidate list under the input line.
    pub fn show_candidates(&mut self, candidates: &[String]) {
        self.output.push(OutputLine::muted(candidates.join("  ")));
    }

    pub fn recall_up(&mut self) -> Option<String> {
        self.history.recall_up().map(str::to_string)
    }

    pub fn recall_down(&mut self) -> Option<String> {
        self.history.recall_down().map(str::to_string)
    }

    pub fn reset_recall(&mut self) {
        self.history.reset_cursor();
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}
