//! Built-in command handlers.
//!
//! Every handler returns a `Reply`: the lines to append plus what the
//! caller should do next. Errors are a single error line, never a panic.

use crate::commands::{Command, CommandDef, COMMANDS};
use crate::content::Content;
use crate::history::CommandHistory;
use crate::runner::{ExecuteResult, TerminalHost};
use crate::OutputLine;

use folio_radar::RadarView;

pub struct Reply {
    pub lines: Vec<OutputLine>,
    pub result: ExecuteResult,
}

impl Reply {
    fn lines(lines: Vec<OutputLine>) -> Self {
        Self {
            lines,
            result: ExecuteResult::Handled,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            lines: vec![OutputLine::error(text)],
            result: ExecuteResult::Failed,
        }
    }
}

/// What a handler may read or poke.
pub struct Context<'a> {
    pub content: &'a Content,
    pub history: &'a CommandHistory,
    pub host: &'a mut dyn TerminalHost,
}

/// Central dispatch for every command in the table.
pub fn dispatch(def: &CommandDef, args: Option<&str>, ctx: &mut Context<'_>) -> Reply {
    match def.command {
        // ── Shell ──
        Command::Help => help(),
        Command::Clear => Reply {
            lines: vec![],
            result: ExecuteResult::ClearScreen,
        },
        Command::Exit => {
            ctx.host.close_terminal();
            Reply {
                lines: vec![OutputLine::muted("Closing terminal.")],
                result: ExecuteResult::Exit,
            }
        }
        Command::History => history(ctx.history, args),
        Command::Echo => Reply::lines(vec![OutputLine::output(args.unwrap_or_default())]),
        Command::Theme => theme(ctx, args),

        // ── Navigation ──
        Command::Ls => ls(ctx.content),
        Command::Goto => goto(ctx, args),
        Command::Open => open(ctx, args),

        // ── Profile ──
        Command::About => about(ctx.content),
        Command::Impact => impact(ctx.content),
        Command::Experience => experience(ctx.content, args),
        Command::Projects => projects(ctx.content, args),
        Command::Skills => skills(ctx.content, args),
        Command::Radar => radar(ctx.host.radar()),
        Command::Resume => resume(ctx),
        Command::Contact => contact(ctx.content),
    }
}

fn help() -> Reply {
    let mut lines = vec![OutputLine::output("Folio terminal. Available commands:")];

    let mut groups: Vec<&str> = Vec::new();
    for def in COMMANDS {
        if !groups.contains(&def.group) {
            groups.push(def.group);
        }
    }

    for group in groups {
        lines.push(OutputLine::output(""));
        lines.push(OutputLine::muted(format!("{}:", group)));
        for def in COMMANDS.iter().filter(|d| d.group == group) {
            let aliases = if def.aliases.is_empty() {
                String::new()
            } else {
                format!(" (aliases: {})", def.aliases.join(", "))
            };
            lines.push(OutputLine::output(format!(
                "  {:<24} {}{}",
                def.usage, def.desc, aliases
            )));
        }
    }

    lines.push(OutputLine::output(""));
    lines.push(OutputLine::muted(
        "Tab completes, Up/Down recall history, !! repeats, Esc closes.",
    ));
    Reply::lines(lines)
}

fn history(history: &CommandHistory, args: Option<&str>) -> Reply {
    let filter = match args {
        None => None,
        Some(a) => match a.strip_prefix("--grep") {
            Some(rest) if rest.starts_with(' ') && !rest.trim().is_empty() => {
                Some(rest.trim().to_lowercase())
            }
            _ => return Reply::error("usage: history [--grep text]"),
        },
    };

    let lines: Vec<OutputLine> = history
        .iter()
        .enumerate()
        .filter(|(_, cmd)| {
            filter
                .as_deref()
                .is_none_or(|needle| cmd.to_lowercase().contains(needle))
        })
        .map(|(i, cmd)| OutputLine::output(format!("  {:>3}  {}", i + 1, cmd)))
        .collect();

    if lines.is_empty() {
        return Reply::lines(vec![OutputLine::muted("No matching history.")]);
    }
    Reply::lines(lines)
}

fn theme(ctx: &mut Context<'_>, args: Option<&str>) -> Reply {
    let available = ctx.host.theme_ids().join(", ");
    let Some(name) = args else {
        return Reply::lines(vec![
            OutputLine::output(format!("Current theme: {}", ctx.host.current_theme())),
            OutputLine::muted(format!("Available: {}", available)),
        ]);
    };

    match ctx.host.set_theme(name) {
        Ok(id) => Reply::lines(vec![OutputLine::success(format!("Theme set to {}.", id))]),
        Err(e) => Reply::error(format!("theme: {}. Available: {}", e, available)),
    }
}

fn ls(content: &Content) -> Reply {
    let mut lines: Vec<OutputLine> = content
        .sections
        .iter()
        .map(|s| OutputLine::output(format!("  {:<12} {}", s.id, s.title)))
        .collect();
    lines.push(OutputLine::muted("Use `goto <section>` to jump."));
    Reply::lines(lines)
}

fn goto(ctx: &mut Context<'_>, args: Option<&str>) -> Reply {
    let Some(name) = args else {
        return Reply::error("usage: goto <section>");
    };
    let Some(section) = ctx.content.find_section(name) else {
        return Reply::error(format!(
            "goto: no section named '{}'. Try `ls`.",
            name
        ));
    };

    ctx.host.navigate(&format!("#{}", section.id));
    Reply::lines(vec![OutputLine::success(format!("→ {}", section.title))])
}

fn open(ctx: &mut Context<'_>, args: Option<&str>) -> Reply {
    let Some(query) = args else {
        return Reply::error("usage: open <index|name>");
    };
    let Some(index) = ctx.content.find_project(query) else {
        return Reply::error(format!(
            "open: no project matches '{}'. Try `projects`.",
            query
        ));
    };

    ctx.host.open_project(index);
    Reply::lines(
        ctx.content
            .project_detail_lines(index)
            .into_iter()
            .map(OutputLine::output)
            .collect(),
    )
}

fn about(content: &Content) -> Reply {
    let p = &content.profile;
    let mut lines = vec![
        OutputLine::success(format!("{}, {}", p.name, p.title)),
        OutputLine::muted(p.location.clone()),
        OutputLine::output(p.summary.clone()),
    ];
    lines.extend(
        p.links
            .iter()
            .map(|l| OutputLine::output(format!("  {:<10} {}", l.label, l.url))),
    );
    Reply::lines(lines)
}

fn impact(content: &Content) -> Reply {
    Reply::lines(
        content
            .impact
            .iter()
            .map(|m| OutputLine::output(format!("  {:>8}  {}", m.value, m.label)))
            .collect(),
    )
}

fn experience(content: &Content, filter: Option<&str>) -> Reply {
    let mut lines = Vec::new();
    for job in content
        .experience
        .iter()
        .filter(|e| filter.is_none_or(|f| e.matches(f)))
    {
        lines.push(OutputLine::success(format!(
            "{} @ {} ({})",
            job.role, job.company, job.period
        )));
        lines.push(OutputLine::output(format!("  {}", job.summary)));
        lines.extend(
            job.highlights
                .iter()
                .map(|h| OutputLine::output(format!("  • {}", h))),
        );
    }

    if lines.is_empty() {
        let f = filter.unwrap_or_default();
        return Reply::lines(vec![OutputLine::muted(format!(
            "No experience matches '{}'.",
            f
        ))]);
    }
    Reply::lines(lines)
}

fn projects(content: &Content, filter: Option<&str>) -> Reply {
    let mut lines: Vec<OutputLine> = content
        .projects
        .iter()
        .enumerate()
        .filter(|(_, p)| filter.is_none_or(|f| p.matches(f)))
        .map(|(i, p)| OutputLine::output(format!("  {}. {}: {}", i + 1, p.title, p.summary)))
        .collect();

    if lines.is_empty() {
        let f = filter.unwrap_or_default();
        return Reply::lines(vec![OutputLine::muted(format!(
            "No projects match '{}'.",
            f
        ))]);
    }
    lines.push(OutputLine::muted("Use `open <index|name>` for details."));
    Reply::lines(lines)
}

fn skills(content: &Content, category: Option<&str>) -> Reply {
    let Some(name) = category else {
        return Reply::lines(
            content
                .skills
                .iter()
                .map(|s| {
                    OutputLine::output(format!(
                        "  {:<12} {} {:.1}/10",
                        s.name,
                        s.bar(),
                        s.level
                    ))
                })
                .collect(),
        );
    };

    let Some(skill) = content.find_skill(name) else {
        let known: Vec<&str> = content.skills.iter().map(|s| s.name.as_str()).collect();
        return Reply::error(format!(
            "skills: unknown category '{}'. Try: {}",
            name,
            known.join(", ")
        ));
    };

    let mut lines = vec![OutputLine::success(format!(
        "{} {} {:.1}/10",
        skill.name,
        skill.bar(),
        skill.level
    ))];
    lines.extend(
        skill
            .sub_skills
            .iter()
            .map(|s| OutputLine::output(format!("  • {}", s))),
    );
    Reply::lines(lines)
}

fn radar(view: Option<RadarView>) -> Reply {
    let Some(view) = view else {
        return Reply::lines(vec![OutputLine::muted(
            "Ship Radar is still scanning. Try again in a moment.",
        )]);
    };

    let failed = matches!(view, RadarView::Failed(_));
    Reply::lines(
        view.summary_lines()
            .into_iter()
            .map(|l| {
                if failed {
                    OutputLine::error(l)
                } else {
                    OutputLine::output(l)
                }
            })
            .collect(),
    )
}

fn resume(ctx: &mut Context<'_>) -> Reply {
    let Some(url) = ctx.content.profile.resume_url.as_deref() else {
        return Reply::error("resume: no résumé link configured.");
    };
    ctx.host.open_url(url);
    Reply::lines(vec![OutputLine::success(format!("Opening résumé: {}", url))])
}

fn contact(content: &Content) -> Reply {
    let p = &content.profile;
    let mut lines = vec![OutputLine::output(format!("  {:<10} {}", "email", p.email))];
    lines.extend(
        p.links
            .iter()
            .map(|l| OutputLine::output(format!("  {:<10} {}", l.label.to_lowercase(), l.url))),
    );
    Reply::lines(lines)
}
