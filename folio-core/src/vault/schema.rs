/// folio-core/src/vault/schema.rs
/// The initial schema for the Folio Vault.
pub const MIGRATION_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS session (
    id TEXT PRIMARY KEY,
    start_time INTEGER NOT NULL,
    end_time INTEGER
);

-- Terminal history, trimmed to the newest HISTORY_LIMIT rows on insert
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    command TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    FOREIGN KEY(session_id) REFERENCES session(id)
);

-- Simple key-value config (settings that persist across sessions)
CREATE TABLE IF NOT EXISTS config (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// V2 migration: Ship Radar last-known-good cache.
pub const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS radar_cache (
    repo TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    cached_at INTEGER NOT NULL
);
"#;
