//! Folio Bridge library target.
//!
//! Exposes the front end's modules for integration tests. The binary entry
//! point is in `main.rs`; everything with logic lives here so `tests/*.rs`
//! can drive it without a real terminal.

// ── State & dispatch ─────────────────────────────────────────────
pub mod app;
pub mod keyboard;
pub mod messages;
pub mod update;

// ── Drawing ──────────────────────────────────────────────────────
pub mod helpers;
pub mod view_ui;

// ── Process plumbing ─────────────────────────────────────────────
pub mod config;
pub mod radar;
pub mod shell;
