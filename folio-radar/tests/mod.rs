use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_radar::{
    fetch_snapshot, load_radar, ApiResponse, CachedSnapshot, GithubApi, RadarConfig, RadarError,
    RadarSnapshot, RadarView, SnapshotCache,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// Fakes
// ============================================================================

/// Scripted GitHub: each path answers from a queue; an exhausted or
/// unknown path answers 404.
#[derive(Default)]
struct FakeApi {
    routes: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeApi {
    fn route(&self, path: &str, resp: ApiResponse) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(resp);
        self
    }

    fn paths(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    fn count(&self, path: &str) -> usize {
        self.paths().iter().filter(|p| p.as_str() == path).count()
    }
}

#[async_trait]
impl GithubApi for FakeApi {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse, RadarError> {
        self.calls.lock().unwrap().push((
            path.to_string(),
            query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        ));
        let mut routes = self.routes.lock().unwrap();
        Ok(routes
            .get_mut(path)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| ApiResponse::status(404)))
    }
}

#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, CachedSnapshot>>,
}

impl SnapshotCache for MemoryCache {
    fn load(&self, repo_full_name: &str) -> Option<CachedSnapshot> {
        self.entries.lock().unwrap().get(repo_full_name).cloned()
    }

    fn store(&self, repo_full_name: &str, snapshot: &RadarSnapshot, cached_at: i64) {
        self.entries.lock().unwrap().insert(
            repo_full_name.to_string(),
            CachedSnapshot {
                snapshot: snapshot.clone(),
                cached_at,
            },
        );
    }
}

const BASE: &str = "/repos/octo/folio";

fn path(suffix: &str) -> String {
    format!("{}{}", BASE, suffix)
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn config() -> RadarConfig {
    RadarConfig::new("octo", "folio")
}

fn deployment(r: &str, who: &str, at: &str) -> Value {
    json!({ "ref": r, "created_at": at, "creator": { "login": who } })
}

/// Routes for every non-deployment endpoint of a healthy repo.
fn healthy_repo(api: &FakeApi) {
    api.route(
        BASE,
        ApiResponse::ok(json!({
            "full_name": "octo/folio",
            "stargazers_count": 42,
            "forks_count": 7,
            "open_issues_count": 5,
            "default_branch": "main",
            "pushed_at": "2026-03-09T12:00:00Z"
        })),
    )
    .route(
        &path("/pulls"),
        ApiResponse::ok(json!([{ "number": 11 }, { "number": 12 }])),
    )
    .route(
        &path("/issues"),
        ApiResponse::ok(json!([
            { "number": 3 },
            { "number": 11, "pull_request": {} },
            { "number": 4 }
        ])),
    )
    .route(
        &path("/languages"),
        ApiResponse::ok(json!({ "Rust": 800, "TypeScript": 200 })),
    )
    .route(
        &path("/actions/runs"),
        ApiResponse::ok(json!({
            "workflow_runs": [{ "status": "completed", "conclusion": "success" }]
        })),
    )
    .route(
        &path("/commits"),
        ApiResponse::ok(json!([
            { "commit": { "committer": { "date": "2026-03-10T09:00:00Z" } } }
        ])),
    );
}

// ============================================================================
// fetch_snapshot
// ============================================================================

#[tokio::test]
async fn test_fetch_builds_snapshot() {
    let api = FakeApi::default();
    api.route(
        &path("/deployments"),
        ApiResponse::ok(json!([
            deployment("v2.1.0", "drtom", "2026-03-08T10:00:00Z"),
            deployment("v2.0.0", "bot", "2026-03-01T10:00:00Z"),
        ])),
    );
    healthy_repo(&api);

    let snap = fetch_snapshot(&api, &config(), now()).await.unwrap();

    assert_eq!(snap.repo_full_name, "octo/folio");
    assert_eq!(snap.version.as_deref(), Some("v2.1.0"));
    assert_eq!(snap.deployed_by.as_deref(), Some("drtom"));
    assert_eq!(snap.last_updated.as_deref(), Some("2026-03-08T10:00:00Z"));
    assert_eq!(snap.stars, 42);
    assert_eq!(snap.forks, 7);
    assert_eq!(snap.open_prs, 2);
    // PR-flagged issue excluded
    assert_eq!(snap.open_issues, 2);
    assert_eq!(snap.default_branch, "main");
    assert_eq!(snap.ci_status.as_deref(), Some("success"));
    assert_eq!(snap.latest_commit_age.as_deref(), Some("3h"));
    assert_eq!(snap.languages_used, vec!["Rust", "TypeScript"]);
    assert_eq!(snap.languages_bar[0].percent, 80.0);
    assert_eq!(snap.deploy_count, 2);
}

#[tokio::test]
async fn test_fetch_order_is_sequential() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::ok(json!([])));
    healthy_repo(&api);

    fetch_snapshot(&api, &config(), now()).await.unwrap();

    let paths = api.paths();
    assert_eq!(paths[0], path("/deployments"));
    assert_eq!(paths[1], BASE);
    assert_eq!(paths[2], path("/pulls"));
    assert_eq!(paths[3], path("/issues"));
    assert_eq!(paths[4], path("/languages"));
    assert_eq!(paths.len(), 7);
}

#[tokio::test]
async fn test_commit_query_uses_default_branch() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::ok(json!([])));
    healthy_repo(&api);

    fetch_snapshot(&api, &config(), now()).await.unwrap();

    let calls = api.calls.lock().unwrap();
    let (_, query) = calls.iter().find(|(p, _)| *p == path("/commits")).unwrap();
    assert!(query.contains(&("sha".to_string(), "main".to_string())));
    assert!(query.contains(&("per_page".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_no_deployments_falls_back_to_pushed_at() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::ok(json!([])));
    healthy_repo(&api);

    let snap = fetch_snapshot(&api, &config(), now()).await.unwrap();
    assert!(snap.version.is_none());
    assert!(snap.deployed_by.is_none());
    assert_eq!(snap.last_updated.as_deref(), Some("2026-03-09T12:00:00Z"));
    assert_eq!(snap.deploy_count, 0);
}

// ============================================================================
// Deployment pagination
// ============================================================================

#[tokio::test]
async fn test_pagination_stops_on_short_page() {
    let api = FakeApi::default();
    let d = || deployment("v1", "a", "2026-01-01T00:00:00Z");
    api.route(&path("/deployments"), ApiResponse::ok(json!([d(), d()])))
        .route(&path("/deployments"), ApiResponse::ok(json!([d(), d()])))
        .route(&path("/deployments"), ApiResponse::ok(json!([d()])))
        .route(&path("/deployments"), ApiResponse::ok(json!([d(), d()])));
    healthy_repo(&api);

    let mut cfg = config();
    cfg.per_page = 2;
    let snap = fetch_snapshot(&api, &cfg, now()).await.unwrap();

    assert_eq!(api.count(&path("/deployments")), 3);
    assert_eq!(snap.deploy_count, 5);
}

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    let api = FakeApi::default();
    let d = || deployment("v1", "a", "2026-01-01T00:00:00Z");
    api.route(&path("/deployments"), ApiResponse::ok(json!([d()])))
        .route(&path("/deployments"), ApiResponse::ok(json!([])));
    healthy_repo(&api);

    let mut cfg = config();
    cfg.per_page = 1;
    let snap = fetch_snapshot(&api, &cfg, now()).await.unwrap();

    assert_eq!(api.count(&path("/deployments")), 2);
    assert_eq!(snap.deploy_count, 1);
}

#[tokio::test]
async fn test_pagination_hard_cap_five_pages() {
    let api = FakeApi::default();
    for _ in 0..8 {
        api.route(
            &path("/deployments"),
            ApiResponse::ok(json!([deployment("v1", "a", "2026-01-01T00:00:00Z")])),
        );
    }
    healthy_repo(&api);

    let mut cfg = config();
    cfg.per_page = 1;
    let snap = fetch_snapshot(&api, &cfg, now()).await.unwrap();

    assert_eq!(api.count(&path("/deployments")), 5);
    assert_eq!(snap.deploy_count, 5);
}

#[tokio::test]
async fn test_pagination_sends_page_numbers() {
    let api = FakeApi::default();
    let d = || deployment("v1", "a", "2026-01-01T00:00:00Z");
    api.route(&path("/deployments"), ApiResponse::ok(json!([d()])))
        .route(&path("/deployments"), ApiResponse::ok(json!([])));
    healthy_repo(&api);

    let mut cfg = config();
    cfg.per_page = 1;
    fetch_snapshot(&api, &cfg, now()).await.unwrap();

    let calls = api.calls.lock().unwrap();
    let pages: Vec<String> = calls
        .iter()
        .filter(|(p, _)| *p == path("/deployments"))
        .filter_map(|(_, q)| q.iter().find(|(k, _)| k == "page").map(|(_, v)| v.clone()))
        .collect();
    assert_eq!(pages, vec!["1", "2"]);
}

// ============================================================================
// Error classification
// ============================================================================

#[tokio::test]
async fn test_403_aborts_as_rate_limited() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::ok(json!([])))
        .route(BASE, ApiResponse::ok(json!({ "default_branch": "main" })))
        .route(&path("/pulls"), ApiResponse::status(403));

    let err = fetch_snapshot(&api, &config(), now()).await.unwrap_err();
    assert_eq!(err, RadarError::RateLimited);
    // Nothing after the failing step was requested
    assert_eq!(api.count(&path("/issues")), 0);
    assert_eq!(api.count(&path("/languages")), 0);
}

#[tokio::test]
async fn test_other_status_is_hard_failure() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::ok(json!([])))
        .route(BASE, ApiResponse::status(500));

    let err = fetch_snapshot(&api, &config(), now()).await.unwrap_err();
    assert_eq!(
        err,
        RadarError::Status {
            status: 500,
            path: BASE.to_string()
        }
    );
}

#[tokio::test]
async fn test_required_404_is_failure() {
    // Only best-effort calls treat 404 as absent
    let api = FakeApi::default();
    let err = fetch_snapshot(&api, &config(), now()).await.unwrap_err();
    assert!(matches!(err, RadarError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_best_effort_absent_is_none() {
    for status in [404u16, 410, 451] {
        let api = FakeApi::default();
        api.route(&path("/deployments"), ApiResponse::ok(json!([])));
        api.route(BASE, ApiResponse::ok(json!({ "default_branch": "main" })))
            .route(&path("/pulls"), ApiResponse::ok(json!([])))
            .route(&path("/issues"), ApiResponse::ok(json!([])))
            .route(&path("/languages"), ApiResponse::ok(json!({})))
            .route(&path("/actions/runs"), ApiResponse::status(status))
            .route(&path("/commits"), ApiResponse::status(status));

        let snap = fetch_snapshot(&api, &config(), now()).await.unwrap();
        assert!(snap.ci_status.is_none(), "status {}", status);
        assert!(snap.latest_commit_age.is_none(), "status {}", status);
    }
}

#[tokio::test]
async fn test_best_effort_403_still_rate_limits() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::ok(json!([])));
    api.route(BASE, ApiResponse::ok(json!({ "default_branch": "main" })))
        .route(&path("/pulls"), ApiResponse::ok(json!([])))
        .route(&path("/issues"), ApiResponse::ok(json!([])))
        .route(&path("/languages"), ApiResponse::ok(json!({})))
        .route(&path("/actions/runs"), ApiResponse::status(403))
        .route(&path("/commits"), ApiResponse::ok(json!([])));

    let err = fetch_snapshot(&api, &config(), now()).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_wrong_shape_is_decode_error() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::ok(json!({ "oops": true })));

    let err = fetch_snapshot(&api, &config(), now()).await.unwrap_err();
    assert!(matches!(err, RadarError::Decode { .. }));
}

// ============================================================================
// load_radar (cache fallback)
// ============================================================================

#[tokio::test]
async fn test_load_success_overwrites_cache() {
    let api = FakeApi::default();
    api.route(
        &path("/deployments"),
        ApiResponse::ok(json!([deployment("v3", "drtom", "2026-03-08T10:00:00Z")])),
    );
    healthy_repo(&api);
    let cache = MemoryCache::default();

    let view = load_radar(&api, &cache, &config(), now()).await;

    assert!(matches!(view, RadarView::Live(_)));
    let cached = cache.load("octo/folio").unwrap();
    assert_eq!(cached.snapshot.version.as_deref(), Some("v3"));
    assert_eq!(cached.cached_at, now().timestamp());
}

#[tokio::test]
async fn test_403_with_cache_renders_stale() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::status(403));

    let cache = MemoryCache::default();
    let old = RadarSnapshot {
        repo_full_name: "octo/folio".to_string(),
        version: Some("v1".to_string()),
        last_updated: None,
        deployed_by: None,
        stars: 1,
        forks: 0,
        open_issues: 0,
        open_prs: 0,
        default_branch: "main".to_string(),
        ci_status: None,
        latest_commit_age: None,
        languages_used: vec![],
        languages_bar: vec![],
        deploy_count: 1,
    };
    cache.store("octo/folio", &old, 1_700_000_000);

    let view = load_radar(&api, &cache, &config(), now()).await;

    assert!(view.is_stale());
    assert_eq!(view.snapshot().unwrap().version.as_deref(), Some("v1"));
    let lines = view.summary_lines();
    assert!(lines[0].contains("stale"));
    assert!(lines[0].contains("2023-11-14"));
    assert!(view.headline().contains("stale"));
}

#[tokio::test]
async fn test_403_without_cache_renders_rate_limit_message() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::status(403));
    let cache = MemoryCache::default();

    let view = load_radar(&api, &cache, &config(), now()).await;

    assert_eq!(view, RadarView::Failed(RadarError::RateLimited));
    assert!(view.summary_lines()[0].contains("rate limit"));
    assert!(cache.load("octo/folio").is_none());
}

#[tokio::test]
async fn test_generic_failure_without_cache() {
    let api = FakeApi::default();
    api.route(&path("/deployments"), ApiResponse::status(502));
    let cache = MemoryCache::default();

    let view = load_radar(&api, &cache, &config(), now()).await;

    assert!(matches!(view, RadarView::Failed(RadarError::Status { status: 502, .. })));
    let lines = view.summary_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("unavailable"));
    assert!(!lines[0].contains("rate limit"));
}

// ============================================================================
// Snapshot serialization
// ============================================================================

#[test]
fn test_snapshot_uses_camel_case_keys() {
    let snap = RadarSnapshot {
        repo_full_name: "octo/folio".to_string(),
        version: None,
        last_updated: None,
        deployed_by: None,
        stars: 0,
        forks: 0,
        open_issues: 0,
        open_prs: 3,
        default_branch: "main".to_string(),
        ci_status: None,
        latest_commit_age: None,
        languages_used: vec![],
        languages_bar: vec![],
        deploy_count: 0,
    };
    let v = serde_json::to_value(&snap).unwrap();
    assert_eq!(v["repoFullName"], "octo/folio");
    assert_eq!(v["openPRs"], 3);
    assert_eq!(v["defaultBranch"], "main");
}
