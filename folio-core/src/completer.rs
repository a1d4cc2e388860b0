//! Tab Completion Engine
//!
//! Two stages:
//! - command names and aliases (e.g., `he` → `help`)
//! - arguments for commands with a known domain:
//!   `theme` (theme ids), `skills` (categories), `goto` (sections),
//!   `open` (project titles and 1-based indices)
//!
//! One candidate fills the line, several are listed, none is silent.

use crate::commands::{self, Command};
use crate::content::Content;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    None,
    /// Replace the input line with this (trailing space included).
    Fill(String),
    /// Show these candidates; the input stays as typed.
    List(Vec<String>),
}

/// Argument domains, captured once from content.
#[derive(Debug, Clone, Default)]
pub struct CompletionDomains {
    pub themes: Vec<String>,
    pub skills: Vec<String>,
    pub sections: Vec<String>,
    pub projects: Vec<String>,
}

impl CompletionDomains {
    pub fn from_content(content: &Content) -> Self {
        let mut projects: Vec<String> = content.projects.iter().map(|p| p.title.clone()).collect();
        projects.extend((1..=content.projects.len()).map(|i| i.to_string()));

        Self {
            themes: content.themes.ids.clone(),
            skills: content.skills.iter().map(|s| s.name.clone()).collect(),
            sections: content.sections.iter().map(|s| s.id.clone()).collect(),
            projects,
        }
    }

    fn for_command(&self, command: Command) -> Option<&[String]> {
        match command {
            Command::Theme => Some(&self.themes),
            Command::Skills => Some(&self.skills),
            Command::Goto => Some(&self.sections),
            Command::Open => Some(&self.projects),
            _ => None,
        }
    }
}

pub fn complete(input: &str, domains: &CompletionDomains) -> Completion {
    let trimmed = input.trim_start();
    let ends_with_space = trimmed.ends_with(char::is_whitespace);
    let token_count = trimmed.split_whitespace().count();

    // ── Stage 1: command name ──
    if token_count <= 1 && !ends_with_space {
        let partial = trimmed.to_lowercase();
        let matches: Vec<String> = commands::all_names()
            .into_iter()
            .filter(|name| name.starts_with(&partial))
            .map(str::to_string)
            .collect();
        return resolve(matches, |name| format!("{} ", name));
    }

    // ── Stage 2: argument ──
    let Some((cmd_token, rest)) = trimmed.split_once(char::is_whitespace) else {
        return Completion::None;
    };
    let Some(def) = commands::lookup(&cmd_token.to_lowercase()) else {
        return Completion::None;
    };
    let Some(domain) = domains.for_command(def.command) else {
        return Completion::None;
    };

    let partial = rest.trim_start().to_lowercase();
    let matches: Vec<String> = domain
        .iter()
        .filter(|candidate| candidate.to_lowercase().starts_with(&partial))
        .cloned()
        .collect();
    resolve(matches, |arg| format!("{} {} ", cmd_token, arg))
}

fn resolve(matches: Vec<String>, fill: impl Fn(&str) -> String) -> Completion {
    match matches.len() {
        0 => Completion::None,
        1 => Completion::Fill(fill(&matches[0])),
        _ => Completion::List(matches),
    }
}
