use serde::{Deserialize, Serialize};

/// Hard cap on deployment pages walked per fetch.
pub const MAX_DEPLOYMENT_PAGES: u32 = 5;

fn default_per_page() -> u32 {
    100
}

/// Which repository the radar watches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarConfig {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl RadarConfig {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            per_page: default_per_page(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageShare {
    pub name: String,
    pub bytes: u64,
    /// Share of total bytes, one decimal place.
    pub percent: f64,
}

/// Everything the radar panel shows, computed once per fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSnapshot {
    pub repo_full_name: String,
    pub version: Option<String>,
    pub last_updated: Option<String>,
    pub deployed_by: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    #[serde(rename = "openPRs")]
    pub open_prs: u64,
    pub default_branch: String,
    pub ci_status: Option<String>,
    pub latest_commit_age: Option<String>,
    pub languages_used: Vec<String>,
    pub languages_bar: Vec<LanguageShare>,
    #[serde(default)]
    pub deploy_count: usize,
}

/// A snapshot as read back from the cache, with the unix time it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSnapshot {
    pub snapshot: RadarSnapshot,
    pub cached_at: i64,
}
