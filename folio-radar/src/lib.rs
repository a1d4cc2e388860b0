//! # Folio Radar
//!
//! The Ship Radar: a small GitHub telemetry reader.
//! Pulls deployments, repo metadata, open PRs/issues, languages and the
//! latest CI run/commit for one repository and folds them into a
//! [`RadarSnapshot`]. Failures fall back to the last cached snapshot.

pub mod age;
pub mod api;
pub mod error;
pub mod fetch;
pub mod model;
pub mod service;

pub use api::{ApiResponse, GithubApi, GithubClient, DEFAULT_API_BASE};
pub use error::RadarError;
pub use fetch::fetch_snapshot;
pub use model::{CachedSnapshot, LanguageShare, RadarConfig, RadarSnapshot, MAX_DEPLOYMENT_PAGES};
pub use service::{load_radar, RadarView, SnapshotCache};
