//! The fixed command table.
//!
//! Drives dispatch (exact name or alias), the `help` manual and
//! tab-completion. Order here is the order `help` prints.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Clear,
    Exit,
    Ls,
    Goto,
    About,
    Impact,
    Experience,
    Projects,
    Open,
    Skills,
    Radar,
    Resume,
    Contact,
    Theme,
    History,
    Echo,
}

#[derive(Debug, Clone, Copy)]
pub struct CommandDef {
    pub command: Command,
    pub group: &'static str,
    pub cmd: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub desc: &'static str,
}

impl CommandDef {
    /// Canonical name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.cmd).chain(self.aliases.iter().copied())
    }
}

pub const COMMANDS: &[CommandDef] = &[
    CommandDef {
        command: Command::Help,
        group: "shell",
        cmd: "help",
        aliases: &["?"],
        usage: "help",
        desc: "Show this manual",
    },
    CommandDef {
        command: Command::Clear,
        group: "shell",
        cmd: "clear",
        aliases: &[],
        usage: "clear",
        desc: "Clear the screen (history is kept)",
    },
    CommandDef {
        command: Command::Exit,
        group: "shell",
        cmd: "exit",
        aliases: &["quit"],
        usage: "exit",
        desc: "Close the terminal",
    },
    CommandDef {
        command: Command::History,
        group: "shell",
        cmd: "history",
        aliases: &[],
        usage: "history [--grep text]",
        desc: "List past commands; !! repeats the last, !n runs entry n",
    },
    CommandDef {
        command: Command::Echo,
        group: "shell",
        cmd: "echo",
        aliases: &[],
        usage: "echo <text>",
        desc: "Print text",
    },
    CommandDef {
        command: Command::Theme,
        group: "shell",
        cmd: "theme",
        aliases: &[],
        usage: "theme [name]",
        desc: "Show or switch the color theme",
    },
    CommandDef {
        command: Command::Ls,
        group: "navigate",
        cmd: "ls",
        aliases: &[],
        usage: "ls",
        desc: "List page sections",
    },
    CommandDef {
        command: Command::Goto,
        group: "navigate",
        cmd: "goto",
        aliases: &[],
        usage: "goto <section>",
        desc: "Jump to a section",
    },
    CommandDef {
        command: Command::Open,
        group: "navigate",
        cmd: "open",
        aliases: &[],
        usage: "open <index|name>",
        desc: "Open a project's details",
    },
    CommandDef {
        command: Command::About,
        group: "profile",
        cmd: "about",
        aliases: &["whoami"],
        usage: "about",
        desc: "Who I am",
    },
    CommandDef {
        command: Command::Impact,
        group: "profile",
        cmd: "impact",
        aliases: &[],
        usage: "impact",
        desc: "Headline numbers",
    },
    CommandDef {
        command: Command::Experience,
        group: "profile",
        cmd: "experience",
        aliases: &["xp"],
        usage: "experience [filter]",
        desc: "Work history, optionally filtered",
    },
    CommandDef {
        command: Command::Projects,
        group: "profile",
        cmd: "projects",
        aliases: &["proj"],
        usage: "projects [filter]",
        desc: "Project list, optionally filtered",
    },
    CommandDef {
        command: Command::Skills,
        group: "profile",
        cmd: "skills",
        aliases: &[],
        usage: "skills [category]",
        desc: "Skill categories, or one category in detail",
    },
    CommandDef {
        command: Command::Radar,
        group: "profile",
        cmd: "radar",
        aliases: &["ship"],
        usage: "radar",
        desc: "Ship Radar: live GitHub delivery stats",
    },
    CommandDef {
        command: Command::Resume,
        group: "profile",
        cmd: "resume",
        aliases: &[],
        usage: "resume",
        desc: "Open the résumé",
    },
    CommandDef {
        command: Command::Contact,
        group: "profile",
        cmd: "contact",
        aliases: &[],
        usage: "contact",
        desc: "How to reach me",
    },
];

/// Exact lookup by (already lowercased) name or alias.
pub fn lookup(name: &str) -> Option<&'static CommandDef> {
    COMMANDS.iter().find(|def| def.names().any(|n| n == name))
}

/// Every name and alias, in table order.
pub fn all_names() -> Vec<&'static str> {
    COMMANDS.iter().flat_map(|def| def.names()).collect()
}
