pub mod builtins;
pub mod commands;
pub mod completer;
pub mod content;
pub mod debounce;
pub mod engine;
pub mod history;
pub mod palette;
pub mod router;
pub mod runner;
pub mod runtime;
pub mod state_machine;
pub mod theme;
pub mod vault;

// Re-export the main struct so users can just use `folio_core::FolioEngine`
pub use engine::FolioEngine;
pub use runner::{ExecuteResult, Terminal, TerminalHost};

use serde::{Deserialize, Serialize};

/// How a scrollback line should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Echo of what the user ran, prompt included.
    Prompt,
    Output,
    Success,
    Muted,
    Error,
}

/// A single line of terminal scrollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self::new(LineKind::Output, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Self::new(LineKind::Muted, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }

    pub fn is_error(&self) -> bool {
        self.kind == LineKind::Error
    }
}
