use chrono::{DateTime, Utc};
use thiserror::Error;

/// Faults raised by the upstream video-listing provider. Transport and API
/// errors are absorbed by the sync loop into a partial count; malformed
/// responses that slip past deserialization are not retried either.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider transport fault: {0}")]
    Transport(String),
    #[error("provider returned an unusable response: {0}")]
    Response(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// One page of a channel's uploads playlist.
#[derive(Debug, Clone)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlaylistItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub published_at: DateTime<Utc>,
}

/// Extended metadata fetched per video.
#[derive(Debug, Clone)]
pub struct VideoDetails {
    pub duration: String,
    pub views_count: i64,
    pub likes_count: i64,
}

/// Counters-only record used by the statistics refresh path.
#[derive(Debug, Clone)]
pub struct VideoStatistics {
    pub video_id: String,
    pub views_count: i64,
    pub likes_count: i64,
}
