use crate::history::CommandHistory;

use regex::Regex;
use std::sync::OnceLock;

static HISTORY_REF: OnceLock<Regex> = OnceLock::new();

/// Result of running `!!` / `!n` expansion over an input line.
#[derive(Debug, PartialEq)]
pub enum Expansion {
    /// Not a history reference; run as typed.
    Plain(String),
    /// A history reference that resolved to this stored command.
    Expanded(String),
    /// A history reference that could not be resolved. Holds the error text.
    Failed(String),
}

impl Expansion {
    pub fn into_line(self) -> Result<String, String> {
        match self {
            Expansion::Plain(s) | Expansion::Expanded(s) => Ok(s),
            Expansion::Failed(e) => Err(e),
        }
    }
}

/// A tokenized command: lowercased name plus the rest rejoined with single spaces.
#[derive(Debug, PartialEq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: String,
}

impl ParsedCommand {
    pub fn args(&self) -> Option<&str> {
        if self.args.is_empty() {
            None
        } else {
            Some(&self.args)
        }
    }
}

pub struct CommandParser;

impl CommandParser {
    /// Resolve `!!` and `!<n>` against history. The whole (trimmed) line must
    /// be the reference; anything else is returned unchanged.
    pub fn expand(line: &str, history: &CommandHistory) -> Expansion {
        let trimmed = line.trim();

        if trimmed == "!!" {
            return match history.last() {
                Some(cmd) => Expansion::Expanded(cmd.to_string()),
                None => Expansion::Failed("!!: no previous command in history".to_string()),
            };
        }

        let re = HISTORY_REF
            .get_or_init(|| Regex::new(r"^!(\d+)$").expect("Invalid history reference Regex"));
        if let Some(caps) = re.captures(trimmed) {
            let reference = &caps[1];
            let found = reference
                .parse::<usize>()
                .ok()
                .and_then(|n| history.nth(n));
            return match found {
                Some(cmd) => Expansion::Expanded(cmd.to_string()),
                None => Expansion::Failed(format!(
                    "!{}: event not found (history has {} entries)",
                    reference,
                    history.len()
                )),
            };
        }

        Expansion::Plain(trimmed.to_string())
    }

    pub fn parse(line: &str) -> Option<ParsedCommand> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?.to_lowercase();
        let args = tokens.collect::<Vec<_>>().join(" ");
        Some(ParsedCommand { name, args })
    }
}
