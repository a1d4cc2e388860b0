//! Sequential GitHub fetch for one repository.
//!
//! Order matters: each call only starts after the previous one resolved,
//! except the two best-effort calls at the end, which are joined.
//! A 403 anywhere aborts the whole fetch as rate limited.

use crate::age::age_since;
use crate::api::{ApiResponse, GithubApi};
use crate::error::RadarError;
use crate::model::{LanguageShare, RadarConfig, RadarSnapshot, MAX_DEPLOYMENT_PAGES};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

/// Status codes a best-effort call treats as "resource absent".
const ABSENT_STATUSES: &[u16] = &[404, 410, 451];

pub async fn fetch_snapshot<A>(
    api: &A,
    config: &RadarConfig,
    now: DateTime<Utc>,
) -> Result<RadarSnapshot, RadarError>
where
    A: GithubApi + ?Sized,
{
    let base = format!("/repos/{}/{}", config.owner, config.repo);
    let per_page = config.per_page.max(1);

    let deployments = fetch_deployments(api, &base, per_page).await?;

    let repo = required(api, &base, &[]).await?;
    if !repo.is_object() {
        return Err(decode_error(&base, "expected a repository object"));
    }

    let pulls_path = format!("{}/pulls", base);
    let pulls = required(
        api,
        &pulls_path,
        &[("state", "open".to_string()), ("per_page", per_page.to_string())],
    )
    .await?;
    let open_prs = as_array(&pulls, &pulls_path)?.len() as u64;

    let issues_path = format!("{}/issues", base);
    let issues = required(
        api,
        &issues_path,
        &[("state", "open".to_string()), ("per_page", per_page.to_string())],
    )
    .await?;
    // The issues endpoint also lists PRs; those carry a `pull_request` key.
    let open_issues = as_array(&issues, &issues_path)?
        .iter()
        .filter(|issue| issue.get("pull_request").is_none())
        .count() as u64;

    let languages_path = format!("{}/languages", base);
    let languages = required(api, &languages_path, &[]).await?;
    let languages_bar = language_shares(&languages, &languages_path)?;

    let default_branch = repo["default_branch"].as_str().unwrap_or("main").to_string();

    let runs_path = format!("{}/actions/runs", base);
    let runs_query = [("per_page", "1".to_string())];
    let commits_path = format!("{}/commits", base);
    let commits_query = [
        ("per_page", "1".to_string()),
        ("sha", default_branch.clone()),
    ];
    let (runs, commits) = tokio::join!(
        best_effort(api, &runs_path, &runs_query),
        best_effort(api, &commits_path, &commits_query),
    );
    let runs = runs?;
    let commits = commits?;

    let latest = deployments.first();
    let snapshot = RadarSnapshot {
        repo_full_name: repo["full_name"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| config.full_name()),
        version: latest.and_then(|d| d["ref"].as_str()).map(short_ref),
        last_updated: latest
            .and_then(|d| d["created_at"].as_str())
            .or_else(|| repo["pushed_at"].as_str())
            .map(str::to_string),
        deployed_by: latest
            .and_then(|d| d["creator"]["login"].as_str())
            .map(str::to_string),
        stars: repo["stargazers_count"].as_u64().unwrap_or(0),
        forks: repo["forks_count"].as_u64().unwrap_or(0),
        open_issues,
        open_prs,
        default_branch,
        ci_status: runs.as_ref().and_then(ci_status),
        latest_commit_age: commits
            .as_ref()
            .and_then(|c| c.get(0))
            .and_then(|c| c["commit"]["committer"]["date"].as_str())
            .and_then(|date| age_since(date, now)),
        languages_used: languages_bar.iter().map(|l| l.name.clone()).collect(),
        languages_bar,
        deploy_count: deployments.len(),
    };

    info!(
        "Radar fetched {}: {} deployments, {} open PRs, {} open issues",
        snapshot.repo_full_name, snapshot.deploy_count, snapshot.open_prs, snapshot.open_issues
    );

    Ok(snapshot)
}

/// Walk deployment pages until an empty or short page, or the page cap.
async fn fetch_deployments<A>(api: &A, base: &str, per_page: u32) -> Result<Vec<Value>, RadarError>
where
    A: GithubApi + ?Sized,
{
    let path = format!("{}/deployments", base);
    let mut all = Vec::new();

    for page in 1..=MAX_DEPLOYMENT_PAGES {
        let body = required(
            api,
            &path,
            &[("per_page", per_page.to_string()), ("page", page.to_string())],
        )
        .await?;
        let items = as_array(&body, &path)?;
        let count = items.len();
        all.extend(items.iter().cloned());

        if count < per_page as usize {
            break;
        }
    }

    debug!("Collected {} deployments from {}", all.len(), path);
    Ok(all)
}

async fn required<A>(api: &A, path: &str, query: &[(&str, String)]) -> Result<Value, RadarError>
where
    A: GithubApi + ?Sized,
{
    let resp = api.get(path, query).await?;
    check(resp, path)
}

async fn best_effort<A>(
    api: &A,
    path: &str,
    query: &[(&str, String)],
) -> Result<Option<Value>, RadarError>
where
    A: GithubApi + ?Sized,
{
    let resp = api.get(path, query).await?;
    if ABSENT_STATUSES.contains(&resp.status) {
        debug!("{} absent (HTTP {})", path, resp.status);
        return Ok(None);
    }
    check(resp, path).map(Some)
}

fn check(resp: ApiResponse, path: &str) -> Result<Value, RadarError> {
    if resp.status == 403 {
        return Err(RadarError::RateLimited);
    }
    if !resp.is_success() {
        return Err(RadarError::Status {
            status: resp.status,
            path: path.to_string(),
        });
    }
    Ok(resp.body)
}

fn as_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, RadarError> {
    value
        .as_array()
        .ok_or_else(|| decode_error(path, "expected a JSON array"))
}

fn decode_error(path: &str, reason: &str) -> RadarError {
    RadarError::Decode {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn language_shares(value: &Value, path: &str) -> Result<Vec<LanguageShare>, RadarError> {
    let map = value
        .as_object()
        .ok_or_else(|| decode_error(path, "expected a language map"))?;

    let mut langs: Vec<(String, u64)> = map
        .iter()
        .map(|(name, bytes)| (name.clone(), bytes.as_u64().unwrap_or(0)))
        .collect();
    langs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let total: u64 = langs.iter().map(|(_, b)| b).sum();
    Ok(langs
        .into_iter()
        .map(|(name, bytes)| {
            let percent = if total == 0 {
                0.0
            } else {
                (bytes as f64 * 1000.0 / total as f64).round() / 10.0
            };
            LanguageShare {
                name,
                bytes,
                percent,
            }
        })
        .collect())
}

fn ci_status(runs: &Value) -> Option<String> {
    let run = runs["workflow_runs"].get(0)?;
    let status = run["status"].as_str()?;
    if status == "completed" {
        Some(run["conclusion"].as_str().unwrap_or(status).to_string())
    } else {
        Some(status.to_string())
    }
}

/// Deployment refs are often full commit shas; keep those short.
fn short_ref(r: &str) -> String {
    let is_sha = r.len() == 40 && r.chars().all(|c| c.is_ascii_hexdigit());
    if is_sha {
        r[..7].to_string()
    } else {
        r.to_string()
    }
}
