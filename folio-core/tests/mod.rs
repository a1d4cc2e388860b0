use folio_core::content::Content;
use folio_core::engine::Focus;
use folio_core::history::HISTORY_LIMIT;
use folio_core::palette::PaletteCommand;
use folio_core::theme::ThemeError;
use folio_core::vault::{Vault, KEY_THEME};
use folio_core::{ExecuteResult, FolioEngine, LineKind, OutputLine, Terminal, TerminalHost};
use folio_radar::{RadarError, RadarSnapshot, RadarView};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct RecordingHost {
    anchors: Vec<String>,
    projects: Vec<usize>,
    theme: String,
    urls: Vec<String>,
    closed: bool,
    radar: Option<RadarView>,
}

impl TerminalHost for RecordingHost {
    fn navigate(&mut self, anchor: &str) {
        self.anchors.push(anchor.to_string());
    }
    fn open_project(&mut self, index: usize) {
        self.projects.push(index);
    }
    fn current_theme(&self) -> String {
        self.theme.clone()
    }
    fn theme_ids(&self) -> Vec<String> {
        vec!["midnight".into(), "paper".into(), "solar".into()]
    }
    fn set_theme(&mut self, id: &str) -> Result<String, ThemeError> {
        match self.theme_ids().into_iter().find(|t| t.eq_ignore_ascii_case(id)) {
            Some(t) => {
                self.theme = t.clone();
                Ok(t)
            }
            None => Err(ThemeError::Unknown(id.to_string())),
        }
    }
    fn close_terminal(&mut self) {
        self.closed = true;
    }
    fn open_url(&mut self, url: &str) {
        self.urls.push(url.to_string());
    }
    fn radar(&self) -> Option<RadarView> {
        self.radar.clone()
    }
}

fn content() -> Arc<Content> {
    Arc::new(Content::builtin().unwrap())
}

fn terminal() -> Terminal {
    Terminal::new(content(), Vault::open_in_memory().unwrap())
}

/// Lines appended by one `execute` call.
fn run(t: &mut Terminal, host: &mut RecordingHost, line: &str) -> Vec<OutputLine> {
    let before = t.output().len();
    t.execute(line, host);
    t.output()[before..].to_vec()
}

fn errors(lines: &[OutputLine]) -> usize {
    lines.iter().filter(|l| l.is_error()).count()
}

fn snapshot() -> RadarSnapshot {
    RadarSnapshot {
        repo_full_name: "DrTomLLC/folio".into(),
        version: Some("v1.2.0".into()),
        last_updated: Some("2026-10-01T12:00:00Z".into()),
        deployed_by: Some("drtom".into()),
        stars: 12,
        forks: 3,
        open_issues: 2,
        open_prs: 1,
        default_branch: "main".into(),
        ci_status: Some("success".into()),
        latest_commit_age: Some("3h".into()),
        languages_used: vec!["Rust".into()],
        languages_bar: vec![],
        deploy_count: 4,
    }
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_unknown_command_is_one_error_line() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "about");
    let before: Vec<_> = t.output().to_vec();

    let lines = run(&mut t, &mut host, "frobnicate now");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].kind, LineKind::Prompt);
    assert!(lines[1].is_error());
    assert!(lines[1].text.contains("frobnicate"));
    assert!(lines[1].text.contains("help"));
    assert_eq!(&t.output()[..before.len()], &before[..]);
}

#[test]
fn test_session_survives_errors() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    assert_eq!(t.execute("nope", &mut host), ExecuteResult::Failed);
    assert_eq!(t.execute("goto", &mut host), ExecuteResult::Failed);
    assert_eq!(t.execute("echo still here", &mut host), ExecuteResult::Handled);
    assert_eq!(t.output().last().unwrap().text, "still here");
}

#[test]
fn test_name_is_case_insensitive_but_exact() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    assert_eq!(errors(&run(&mut t, &mut host, "HELP")), 0);
    assert_eq!(errors(&run(&mut t, &mut host, "hel")), 1);
}

#[test]
fn test_aliases_dispatch_like_canonical() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    let a = run(&mut t, &mut host, "about");
    let b = run(&mut t, &mut host, "whoami");
    assert_eq!(a[1..], b[1..]);
}

#[test]
fn test_help_lists_every_command() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    let lines = run(&mut t, &mut host, "?");
    let text: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
    for cmd in folio_core::commands::COMMANDS {
        assert!(
            text.iter().any(|l| l.contains(cmd.usage)),
            "help is missing {}",
            cmd.cmd
        );
    }
}

#[test]
fn test_clear_keeps_history() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "ls");
    assert_eq!(t.execute("clear", &mut host), ExecuteResult::ClearScreen);
    assert!(t.output().is_empty());
    assert_eq!(t.history().len(), 2);
}

// ============================================================================
// History expansion
// ============================================================================

#[test]
fn test_bang_bang_reruns_and_stores_expanded_text() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "echo hello");
    let lines = run(&mut t, &mut host, "!!");
    assert!(lines[0].text.ends_with("echo hello"));
    assert_eq!(lines[1].text, "hello");

    let stored: Vec<_> = t.history().iter().collect();
    assert_eq!(stored, vec!["echo hello", "echo hello"]);

    // Chains keep working
    run(&mut t, &mut host, "!!");
    assert_eq!(t.history().len(), 3);
}

#[test]
fn test_bang_bang_with_empty_history() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    let lines = run(&mut t, &mut host, "!!");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].is_error());
    assert!(t.history().is_empty());
}

#[test]
fn test_bang_n_in_and_out_of_range() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "echo one");
    run(&mut t, &mut host, "echo two");

    let lines = run(&mut t, &mut host, "!1");
    assert_eq!(lines[1].text, "one");

    let lines = run(&mut t, &mut host, "!9");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].is_error());
    assert_eq!(t.history().len(), 3);
}

#[test]
fn test_history_capped_at_limit() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    for i in 0..(HISTORY_LIMIT + 10) {
        t.execute(&format!("echo {}", i), &mut host);
    }
    assert_eq!(t.history().len(), HISTORY_LIMIT);
    assert_eq!(t.history().nth(1), Some("echo 10"));
}

#[test]
fn test_history_command_numbers_match_bang_n() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "echo alpha");
    run(&mut t, &mut host, "ls");
    let lines = run(&mut t, &mut host, "history --grep ALPHA");
    // The history command itself is entry 3 and matches too
    assert_eq!(lines.len(), 3);
    assert!(lines[1].text.trim_start().starts_with("1 "));
    assert!(lines[2].text.trim_start().starts_with("3 "));
}

#[test]
fn test_recall_clamps_and_resets_on_submit() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "echo a");
    run(&mut t, &mut host, "echo b");

    assert_eq!(t.recall_up().as_deref(), Some("echo b"));
    assert_eq!(t.recall_up().as_deref(), Some("echo a"));
    assert_eq!(t.recall_up().as_deref(), Some("echo a"));
    assert_eq!(t.recall_down().as_deref(), Some("echo b"));
    assert_eq!(t.recall_down().as_deref(), Some("echo b"));

    run(&mut t, &mut host, "ls");
    assert_eq!(t.recall_up().as_deref(), Some("ls"));
}

#[test]
fn test_failed_expansion_resets_recall() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    for line in ["echo a", "echo b", "echo c"] {
        run(&mut t, &mut host, line);
    }
    for _ in 0..3 {
        t.recall_up();
    }
    assert_eq!(t.history().cursor(), Some(0));

    assert_eq!(t.execute("!99", &mut host), ExecuteResult::Failed);
    assert_eq!(t.history().cursor(), None);
    assert_eq!(t.recall_up().as_deref(), Some("echo c"));
}

#[test]
fn test_blank_submit_resets_recall() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "echo a");
    run(&mut t, &mut host, "echo b");
    t.recall_up();
    t.recall_up();

    assert_eq!(t.execute("   ", &mut host), ExecuteResult::Ignored);
    assert_eq!(t.recall_up().as_deref(), Some("echo b"));
}

// ============================================================================
// Host side effects
// ============================================================================

#[test]
fn test_goto_projects_navigates_to_anchor() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "goto projects");
    run(&mut t, &mut host, "goto #Skills");
    assert_eq!(host.anchors, vec!["#projects", "#skills"]);

    let lines = run(&mut t, &mut host, "goto nowhere");
    assert_eq!(errors(&lines), 1);
    assert_eq!(host.anchors.len(), 2);
}

#[test]
fn test_open_by_index_and_name() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "open 1");
    run(&mut t, &mut host, "open deploy");
    assert_eq!(host.projects, vec![0, 2]);

    assert_eq!(errors(&run(&mut t, &mut host, "open 99")), 1);
    assert_eq!(errors(&run(&mut t, &mut host, "open")), 1);
}

#[test]
fn test_skills_category_detail() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    let lines = run(&mut t, &mut host, "skills aws");
    // echo + category + one per sub-skill
    assert_eq!(lines.len(), 1 + 1 + 3);
    assert!(lines[1].text.starts_with("AWS"));
    assert!(lines[2].text.contains("EKS"));
}

#[test]
fn test_theme_command() {
    let mut t = terminal();
    let mut host = RecordingHost {
        theme: "midnight".into(),
        ..Default::default()
    };
    let lines = run(&mut t, &mut host, "theme PAPER");
    assert_eq!(lines[1].kind, LineKind::Success);
    assert_eq!(host.theme, "paper");

    let lines = run(&mut t, &mut host, "theme neon");
    assert_eq!(errors(&lines), 1);
    assert_eq!(host.theme, "paper");
}

#[test]
fn test_resume_opens_url() {
    let mut t = terminal();
    let mut host = RecordingHost::default();
    run(&mut t, &mut host, "resume");
    assert_eq!(host.urls.len(), 1);
}

#[test]
fn test_radar_views() {
    let mut t = terminal();
    let mut host = RecordingHost::default();

    let lines = run(&mut t, &mut host, "radar");
    assert_eq!(lines[1].kind, LineKind::Muted);

    host.radar = Some(RadarView::Stale {
        snapshot: snapshot(),
        cached_at: 1_759_000_000,
        reason: RadarError::RateLimited,
    });
    let lines = run(&mut t, &mut host, "ship");
    assert!(lines[1].text.contains("stale"));

    host.radar = Some(RadarView::Failed(RadarError::RateLimited));
    let lines = run(&mut t, &mut host, "radar");
    assert!(lines[1..].iter().all(|l| l.is_error()));
    assert!(lines[1].text.to_lowercase().contains("rate limit"));
}

// ============================================================================
// Engine
// ============================================================================

#[test]
fn test_engine_goto_moves_router() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    let offsets: Vec<usize> = (0..engine.content().sections.len()).map(|i| i * 10).collect();
    engine.router_mut().set_offsets(&offsets);

    engine.execute("goto projects");
    assert_eq!(engine.router().active().unwrap().id, "projects");
}

#[test]
fn test_engine_open_sets_modal() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    engine.execute("open 1");
    assert_eq!(engine.modal(), Some(0));
}

#[test]
fn test_engine_exit_restores_focus() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    engine.execute("open 2");
    engine.open_terminal();
    assert!(engine.terminal_open());

    assert_eq!(engine.execute("exit"), ExecuteResult::Exit);
    assert!(!engine.terminal_open());
    assert_eq!(engine.take_restored_focus(), Some(Focus::Modal));
}

#[test]
fn test_engine_modal_opened_in_terminal_becomes_restore_target() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    engine.open_terminal();
    engine.execute("open 1");

    assert_eq!(engine.execute("exit"), ExecuteResult::Exit);
    assert_eq!(engine.take_restored_focus(), Some(Focus::Modal));
    assert_eq!(engine.modal(), Some(0));
}

#[test]
fn test_engine_restore_page_focus_dismisses_modal() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    engine.execute("open 2");
    engine.open_terminal();
    engine.close_modal();
    assert_eq!(engine.close_terminal(), Some(Focus::Page));

    engine.execute("open 1");
    engine.restore_focus(Focus::Page);
    assert_eq!(engine.modal(), None);
}

#[test]
fn test_engine_theme_cycle_wraps() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    let ids = engine.content().themes.ids.clone();
    for _ in 0..ids.len() {
        engine.cycle_theme();
    }
    assert_eq!(engine.theme(), engine.content().themes.default);
}

#[test]
fn test_engine_palette_theme_query() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    engine.palette_mut().open();
    engine.palette_mut().set_query("theme paper");
    engine.palette_enter();
    assert_eq!(engine.theme(), "paper");
    assert!(!engine.palette().is_open());
}

#[test]
fn test_engine_palette_open_terminal() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    engine.run_palette(PaletteCommand::OpenTerminal);
    assert!(engine.terminal_open());
    assert_eq!(engine.close_terminal(), Some(Focus::Page));
}

#[test]
fn test_engine_tab_lists_candidates() {
    let mut engine = FolioEngine::new(content(), Vault::open_in_memory().unwrap());
    let before = engine.terminal().output().len();
    assert_eq!(engine.complete("e"), None);
    assert_eq!(engine.terminal().output().len(), before + 1);
    assert_eq!(engine.complete("theme so"), Some("theme solar ".to_string()));
}

#[test]
fn test_engine_radar_toggle_persists() {
    let vault = Vault::open_in_memory().unwrap();
    let mut engine = FolioEngine::new(content(), vault.clone());
    assert!(!engine.radar_collapsed());
    engine.toggle_radar();

    let engine = FolioEngine::new(content(), vault);
    assert!(engine.radar_collapsed());
}

// ============================================================================
// Persistence across restarts
// ============================================================================

#[test]
fn test_history_and_theme_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.db");

    {
        let vault = Vault::open(&path).unwrap();
        let mut engine = FolioEngine::new(content(), vault);
        engine.execute("echo persisted");
        engine.execute("theme solar");
        engine.shutdown();
    }

    let vault = Vault::open(&path).unwrap();
    assert_eq!(vault.get_config(KEY_THEME).unwrap().as_deref(), Some("solar"));

    let mut engine = FolioEngine::new(content(), vault);
    assert_eq!(engine.theme(), "solar");
    assert_eq!(engine.terminal().history().len(), 2);
    assert_eq!(engine.terminal_mut().recall_up().as_deref(), Some("theme solar"));
}

#[test]
fn test_engine_open_from_paths() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("folio.db");

    let engine = FolioEngine::open(None, &db).unwrap();
    assert_eq!(engine.theme(), engine.content().themes.default);
    assert!(db.exists());

    let custom = dir.path().join("content.json");
    std::fs::write(&custom, include_str!("../assets/content.json")).unwrap();
    assert!(FolioEngine::open(Some(&custom), &db).is_ok());
}

#[test]
fn test_engine_open_reports_missing_content() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let err = FolioEngine::open(Some(&missing), &dir.path().join("folio.db")).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}

#[test]
fn test_boot_banner_once_per_vault() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.db");

    let first = FolioEngine::new(content(), Vault::open(&path).unwrap());
    let first_len = first.terminal().output().len();
    drop(first);

    let second = FolioEngine::new(content(), Vault::open(&path).unwrap());
    assert!(second.terminal().output().len() < first_len);
}
