use crate::api::GithubApi;
use crate::error::RadarError;
use crate::fetch::fetch_snapshot;
use crate::model::{CachedSnapshot, RadarConfig, RadarSnapshot};

use chrono::{DateTime, Utc};
use tracing::warn;

/// Last-known-good storage for snapshots, keyed by repo full name.
/// Entries never expire; they are only read when a live fetch fails.
pub trait SnapshotCache: Send + Sync {
    fn load(&self, repo_full_name: &str) -> Option<CachedSnapshot>;
    fn store(&self, repo_full_name: &str, snapshot: &RadarSnapshot, cached_at: i64);
}

/// What the radar panel should show.
#[derive(Debug, Clone, PartialEq)]
pub enum RadarView {
    Live(RadarSnapshot),
    Stale {
        snapshot: RadarSnapshot,
        cached_at: i64,
        reason: RadarError,
    },
    Failed(RadarError),
}

impl RadarView {
    pub fn snapshot(&self) -> Option<&RadarSnapshot> {
        match self {
            RadarView::Live(s) | RadarView::Stale { snapshot: s, .. } => Some(s),
            RadarView::Failed(_) => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, RadarView::Stale { .. })
    }

    /// One line for status bars.
    pub fn headline(&self) -> String {
        match self {
            RadarView::Live(s) => format!(
                "◉ {} {} · ★{} · CI {}",
                s.repo_full_name,
                s.version.as_deref().unwrap_or("—"),
                s.stars,
                s.ci_status.as_deref().unwrap_or("n/a")
            ),
            RadarView::Stale { snapshot, .. } => format!(
                "◌ {} {} (stale)",
                snapshot.repo_full_name,
                snapshot.version.as_deref().unwrap_or("—")
            ),
            RadarView::Failed(RadarError::RateLimited) => "◌ radar: rate limited".to_string(),
            RadarView::Failed(_) => "◌ radar: offline".to_string(),
        }
    }

    /// Full summary card as text lines.
    pub fn summary_lines(&self) -> Vec<String> {
        match self {
            RadarView::Live(s) => snapshot_lines(s),
            RadarView::Stale {
                snapshot,
                cached_at,
                reason,
            } => {
                let when = DateTime::from_timestamp(*cached_at, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "an earlier visit".to_string());
                let mut lines = vec![format!(
                    "⚠ Showing cached radar from {} (stale: {})",
                    when, reason
                )];
                lines.extend(snapshot_lines(snapshot));
                lines
            }
            RadarView::Failed(RadarError::RateLimited) => vec![
                "⚠ Ship Radar: GitHub API rate limit reached and no cached data yet.".to_string(),
                "  Try again later or set GITHUB_TOKEN.".to_string(),
            ],
            RadarView::Failed(e) => vec![format!("❌ Ship Radar unavailable: {}", e)],
        }
    }
}

fn snapshot_lines(s: &RadarSnapshot) -> Vec<String> {
    let mut lines = vec![format!(
        "◉ {}  {}  ({} deploys)",
        s.repo_full_name,
        s.version.as_deref().unwrap_or("unversioned"),
        s.deploy_count
    )];

    if let Some(updated) = &s.last_updated {
        match &s.deployed_by {
            Some(who) => lines.push(format!("  updated {} by {}", updated, who)),
            None => lines.push(format!("  updated {}", updated)),
        }
    }

    lines.push(format!(
        "  ★ {}  ⑂ {}  issues {}  PRs {}",
        s.stars, s.forks, s.open_issues, s.open_prs
    ));
    lines.push(format!(
        "  branch {}  CI {}  last commit {}",
        s.default_branch,
        s.ci_status.as_deref().unwrap_or("n/a"),
        s.latest_commit_age
            .as_ref()
            .map(|a| format!("{} ago", a))
            .unwrap_or_else(|| "unknown".to_string())
    ));

    if !s.languages_bar.is_empty() {
        let bar: Vec<String> = s
            .languages_bar
            .iter()
            .map(|l| format!("{} {:.1}%", l.name, l.percent))
            .collect();
        lines.push(format!("  languages: {}", bar.join(" · ")));
    }
    lines
}

/// Fetch live data; on success overwrite the cache, on failure fall back to it.
pub async fn load_radar<A, C>(
    api: &A,
    cache: &C,
    config: &RadarConfig,
    now: DateTime<Utc>,
) -> RadarView
where
    A: GithubApi + ?Sized,
    C: SnapshotCache + ?Sized,
{
    let repo = config.full_name();
    match fetch_snapshot(api, config, now).await {
        Ok(snapshot) => {
            cache.store(&repo, &snapshot, now.timestamp());
            RadarView::Live(snapshot)
        }
        Err(reason) => {
            warn!("Radar fetch for {} failed: {}", repo, reason);
            match cache.load(&repo) {
                Some(cached) => RadarView::Stale {
                    snapshot: cached.snapshot,
                    cached_at: cached.cached_at,
                    reason,
                },
                None => RadarView::Failed(reason),
            }
        }
    }
}
