//! Ship Radar background load.
//!
//! One fetch per process. The result is sent back over a channel so the
//! event loop never waits on the network.

use crate::config::FolioConfig;

use folio_core::vault::Vault;
use folio_radar::{GithubClient, RadarConfig, RadarError, RadarView, SnapshotCache, load_radar};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Start the radar load. Returns `None` when the content has no repository to watch.
pub fn spawn(
    config: &FolioConfig,
    radar: Option<RadarConfig>,
    vault: Vault,
    tx: mpsc::Sender<RadarView>,
) -> Option<JoinHandle<()>> {
    let radar = radar?;
    let offline = config.offline;
    let base_url = config.github_api.clone();
    let token = config.github_token.clone();

    Some(tokio::spawn(async move {
        let view = if offline {
            offline_view(&vault, &radar)
        } else {
            match GithubClient::new(&base_url, token) {
                Ok(client) => load_radar(&client, &vault, &radar, Utc::now()).await,
                Err(e) => {
                    error!("Radar: could not build HTTP client: {:#}", e);
                    cached_or_failed(&vault, &radar, RadarError::Transport(e.to_string()))
                }
            }
        };

        info!("Radar: {}", view.headline());
        if tx.send(view).await.is_err() {
            warn!("Radar: UI went away before the result arrived");
        }
    }))
}

/// Cache only. Never touches the network.
pub fn offline_view(cache: &dyn SnapshotCache, radar: &RadarConfig) -> RadarView {
    cached_or_failed(cache, radar, RadarError::Transport("offline mode".into()))
}

fn cached_or_failed(cache: &dyn SnapshotCache, radar: &RadarConfig, reason: RadarError) -> RadarView {
    match cache.load(&radar.full_name()) {
        Some(cached) => RadarView::Stale {
            snapshot: cached.snapshot,
            cached_at: cached.cached_at,
            reason,
        },
        None => RadarView::Failed(reason),
    }
}
