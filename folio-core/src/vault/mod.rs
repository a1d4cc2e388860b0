// folio-core/src/vault/mod.rs

use chrono::Utc;
use folio_radar::{CachedSnapshot, RadarSnapshot, SnapshotCache};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

pub mod schema;

/// Config keys used across the app.
pub const KEY_THEME: &str = "theme";
pub const KEY_RADAR_COLLAPSED: &str = "radar.collapsed";
pub const KEY_BOOT_SEEN: &str = "boot.seen";

// ════════════════════════════════════════════════════════════════════
// Vault
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct Vault {
    conn: Arc<Mutex<Connection>>,
    session_id: String,
    start_time: i64,
}

impl Vault {
    /// Open the Vault at the specified path.
    /// Creates the database file and runs all migrations if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(&path)?;

        // WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::init(conn)
    }

    /// A throwaway vault, used by tests and `--offline` style runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(schema::MIGRATION_INIT)?;
        conn.execute_batch(schema::MIGRATION_V2)?;

        let vault = Self {
            conn: Arc::new(Mutex::new(conn)),
            session_id: Uuid::new_v4().to_string(),
            start_time: Utc::now().timestamp(),
        };

        vault.start_session()?;

        Ok(vault)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves SQLite itself consistent.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    // ────────────────────────────────────────────────────────────────
    // Sessions
    // ────────────────────────────────────────────────────────────────

    fn start_session(&self) -> Result<()> {
        self.conn().execute(
            "INSERT INTO session (id, start_time) VALUES (?1, ?2)",
            params![self.session_id, self.start_time],
        )?;
        Ok(())
    }

    /// Mark the current session as ended.
    pub fn close_session(&self) -> Result<()> {
        self.conn().execute(
            "UPDATE session SET end_time = ?1 WHERE id = ?2",
            params![Utc::now().timestamp(), self.session_id],
        )?;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────
    // Terminal history
    // ────────────────────────────────────────────────────────────────

    /// Append a history entry and drop everything older than the newest `limit`.
    pub fn append_history(&self, cmd: &str, limit: usize) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO history (session_id, command, timestamp) VALUES (?1, ?2, ?3)",
            params![self.session_id, cmd, Utc::now().timestamp()],
        )?;
        conn.execute(
            "DELETE FROM history WHERE id NOT IN (
                 SELECT id FROM history ORDER BY id DESC LIMIT ?1
             )",
            params![limit as i64],
        )?;
        Ok(())
    }

    /// The newest `limit` entries, oldest first.
    pub fn load_history(&self, limit: usize) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT command FROM (
                 SELECT id, command FROM history ORDER BY id DESC LIMIT ?1
             ) ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    // ────────────────────────────────────────────────────────────────
    // Config (key-value settings)
    // ────────────────────────────────────────────────────────────────

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        self.conn()
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
    }

    /// Boolean flag; missing, unreadable or malformed values read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        match self.get_config(key) {
            Ok(Some(v)) => v == "true",
            Ok(None) => false,
            Err(e) => {
                warn!("Vault: failed to read flag {}: {}", key, e);
                false
            }
        }
    }

    pub fn set_flag(&self, key: &str, value: bool) {
        if let Err(e) = self.set_config(key, if value { "true" } else { "false" }) {
            warn!("Vault: failed to write flag {}: {}", key, e);
        }
    }

    // ────────────────────────────────────────────────────────────────
    // Ship Radar cache
    // ────────────────────────────────────────────────────────────────

    pub fn store_radar(&self, repo: &str, payload: &str, cached_at: i64) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO radar_cache (repo, payload, cached_at) VALUES (?1, ?2, ?3)",
            params![repo, payload, cached_at],
        )?;
        Ok(())
    }

    pub fn load_radar(&self, repo: &str) -> Result<Option<(String, i64)>> {
        self.conn()
            .query_row(
                "SELECT payload, cached_at FROM radar_cache WHERE repo = ?1",
                params![repo],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()
    }
}

/// The radar cache never surfaces storage problems: a failed read is a miss,
/// a failed write is logged and dropped.
impl SnapshotCache for Vault {
    fn load(&self, repo_full_name: &str) -> Option<CachedSnapshot> {
        let (payload, cached_at) = match self.load_radar(repo_full_name) {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(e) => {
                warn!("Vault: radar cache read failed: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<RadarSnapshot>(&payload) {
            Ok(snapshot) => Some(CachedSnapshot {
                snapshot,
                cached_at,
            }),
            Err(e) => {
                warn!("Vault: corrupt radar cache for {}: {}", repo_full_name, e);
                None
            }
        }
    }

    fn store(&self, repo_full_name: &str, snapshot: &RadarSnapshot, cached_at: i64) {
        let payload = match serde_json::to_string(snapshot) {
            Ok(p) => p,
            Err(e) => {
                warn!("Vault: could not serialize radar snapshot: {}", e);
                return;
            }
        };
        if let Err(e) = self.store_radar(repo_full_name, &payload, cached_at) {
            warn!("Vault: radar cache write failed: {}", e);
        }
    }
}
