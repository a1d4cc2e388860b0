//! Theme provider: current theme id, validated against the configured list,
//! persisted to the vault and broadcast on change.

use crate::content::ThemeConfig;
use crate::vault::{Vault, KEY_THEME};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("unknown theme '{0}'")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChange {
    pub from: String,
    pub to: String,
}

#[derive(Debug)]
pub struct ThemeProvider {
    ids: Vec<String>,
    current: String,
    vault: Vault,
    tx: broadcast::Sender<ThemeChange>,
}

impl ThemeProvider {
    /// Restore the saved theme if it is still configured, else the default.
    pub fn new(config: &ThemeConfig, vault: Vault) -> Self {
        let saved = match vault.get_config(KEY_THEME) {
            Ok(v) => v,
            Err(e) => {
                warn!("Theme: could not read saved theme: {}", e);
                None
            }
        };

        // An empty list still has its default to show and cycle over.
        let ids = if config.ids.is_empty() {
            warn!("Theme: no themes configured, using {}", config.default);
            vec![config.default.clone()]
        } else {
            config.ids.clone()
        };

        let current = saved
            .and_then(|s| ids.iter().find(|id| id.eq_ignore_ascii_case(&s)).cloned())
            .unwrap_or_else(|| config.default.clone());

        let (tx, _) = broadcast::channel(16);
        Self {
            ids,
            current,
            vault,
            tx,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThemeChange> {
        self.tx.subscribe()
    }

    /// Switch theme. Matching is case-insensitive; the stored id is canonical.
    pub fn set(&mut self, id: &str) -> Result<&str, ThemeError> {
        let wanted = id.trim();
        let Some(canonical) = self
            .ids
            .iter()
            .find(|t| t.eq_ignore_ascii_case(wanted))
            .cloned()
        else {
            return Err(ThemeError::Unknown(wanted.to_string()));
        };

        self.apply(canonical);
        Ok(&self.current)
    }

    /// Advance to the next configured theme, wrapping from last to first.
    pub fn cycle(&mut self) -> &str {
        let next = match self.ids.iter().position(|t| *t == self.current) {
            Some(idx) => self.ids.get((idx + 1) % self.ids.len()),
            None => self.ids.first(),
        };
        if let Some(next) = next.cloned() {
            self.apply(next);
        }
        &self.current
    }

    fn apply(&mut self, next: String) {
        let from = std::mem::replace(&mut self.current, next);
        info!("Theme: {} -> {}", from, self.current);

        if let Err(e) = self.vault.set_config(KEY_THEME, &self.current) {
            warn!("Theme: could not persist theme: {}", e);
        }
        // No subscribers is fine
        let _ = self.tx.send(ThemeChange {
            from,
            to: self.current.clone(),
        });
    }
}
