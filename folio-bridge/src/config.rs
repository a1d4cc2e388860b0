//! Runtime configuration.
//!
//! Layered: built-in defaults, then `<config_dir>/config.json`, then
//! environment variables. A missing or corrupt file is not an error.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const ENV_CONTENT: &str = "FOLIO_CONTENT";
pub const ENV_DATA_DIR: &str = "FOLIO_DATA_DIR";
pub const ENV_GITHUB_API: &str = "FOLIO_GITHUB_API";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_OFFLINE: &str = "FOLIO_OFFLINE";
pub const ENV_DEBUG: &str = "FOLIO_DEBUG";

#[derive(Debug, Clone, PartialEq)]
pub struct FolioConfig {
    /// Content JSON; `None` uses the compiled-in content.
    pub content_path: Option<PathBuf>,
    /// Holds `folio.db` and `folio.log`.
    pub data_dir: PathBuf,
    pub github_api: String,
    pub github_token: Option<String>,
    /// Skip the network; radar shows the cache only.
    pub offline: bool,
    pub debug: bool,
}

/// The subset of keys accepted in `config.json`. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FileConfig {
    content: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    github_api: Option<String>,
    github_token: Option<String>,
    offline: Option<bool>,
    debug: Option<bool>,
}

impl FolioConfig {
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            content_path: None,
            data_dir,
            github_api: folio_radar::DEFAULT_API_BASE.to_string(),
            github_token: None,
            offline: false,
            debug: false,
        }
    }

    /// Resolve the full configuration for this process.
    pub fn load() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "folio", "folio")
            .context("Could not determine a home directory")?;

        let mut config = Self::with_data_dir(dirs.data_dir().to_path_buf());
        config.apply_file(&dirs.config_dir().join("config.json"));
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merge `config.json` if it exists and parses.
    pub fn apply_file(&mut self, path: &Path) {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                warn!("Config: cannot read {}: {}", path.display(), e);
                return;
            }
        };

        match serde_json::from_str::<FileConfig>(&raw) {
            Ok(file) => self.merge(file),
            Err(e) => warn!("Config: ignoring corrupt {}: {}", path.display(), e),
        }
    }

    fn merge(&mut self, file: FileConfig) {
        if let Some(p) = file.content {
            self.content_path = Some(p);
        }
        if let Some(d) = file.data_dir {
            self.data_dir = d;
        }
        if let Some(api) = file.github_api {
            self.github_api = api;
        }
        if file.github_token.is_some() {
            self.github_token = file.github_token;
        }
        if let Some(offline) = file.offline {
            self.offline = offline;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
    }

    /// Environment overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(p) = set(ENV_CONTENT) {
            self.content_path = Some(PathBuf::from(p));
        }
        if let Some(d) = set(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(d);
        }
        if let Some(api) = set(ENV_GITHUB_API) {
            self.github_api = api;
        }
        if let Some(token) = set(ENV_GITHUB_TOKEN) {
            self.github_token = Some(token);
        }
        if let Some(v) = set(ENV_OFFLINE) {
            self.offline = is_truthy(&v);
        }
        if let Some(v) = set(ENV_DEBUG) {
            self.debug = is_truthy(&v);
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("folio.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("folio.log")
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
