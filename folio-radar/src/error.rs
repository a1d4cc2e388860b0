use thiserror::Error;

/// Why a radar fetch gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RadarError {
    /// GitHub answered 403. Unauthenticated clients hit this after 60 calls/hour.
    #[error("GitHub API rate limit reached")]
    RateLimited,

    #[error("GitHub returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected payload from {path}: {reason}")]
    Decode { path: String, reason: String },
}

impl RadarError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RadarError::RateLimited)
    }
}
