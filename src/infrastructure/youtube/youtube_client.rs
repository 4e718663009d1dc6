use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::error;

use crate::application::usecases::catalog_sync::{PROVIDER_BATCH_SIZE, VideoProvider};
use crate::domain::value_objects::catalog_sync::{
    PlaylistItem, PlaylistPage, ProviderError, VideoDetails, VideoStatistics,
};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 client. All endpoints used here are read-only.
pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelResource {
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItemResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    snippet: PlaylistItemSnippet,
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: String,
    #[serde(default)]
    description: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    fn best_url(self) -> String {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|thumbnail| thumbnail.url)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: String,
    video_published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    content_details: Option<VideoContentDetails>,
    #[serde(default)]
    statistics: VideoStatisticsResource,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
}

// View/like counters arrive as decimal strings.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct VideoStatisticsResource {
    view_count: Option<String>,
    like_count: Option<String>,
}

impl VideoStatisticsResource {
    fn views(&self) -> i64 {
        self.view_count
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }

    fn likes(&self) -> i64 {
        self.like_count
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }
}

impl YoutubeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let resp = self
            .http
            .get(format!("{API_BASE}/{path}"))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(%status, path, response_body = %body, "youtube api request failed");
            return Err(ProviderError::Response(format!(
                "{path} returned status {status}"
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|err| ProviderError::Response(err.to_string()))
    }
}

#[async_trait]
impl VideoProvider for YoutubeClient {
    async fn uploads_playlist_id(
        &self,
        channel_id: &str,
    ) -> Result<Option<String>, ProviderError> {
        let parsed: ChannelListResponse = self
            .get_json(
                "channels",
                &[("part", "contentDetails"), ("id", channel_id)],
            )
            .await?;

        Ok(parsed
            .items
            .into_iter()
            .next()
            .map(|channel| channel.content_details.related_playlists.uploads))
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<PlaylistPage, ProviderError> {
        let max_results = PROVIDER_BATCH_SIZE.to_string();
        let mut query = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            query.push(("pageToken", token));
        }

        let parsed: PlaylistItemListResponse = self.get_json("playlistItems", &query).await?;

        let items = parsed
            .items
            .into_iter()
            .map(|item| PlaylistItem {
                video_id: item.content_details.video_id,
                title: item.snippet.title,
                description: item.snippet.description,
                thumbnail_url: item.snippet.thumbnails.best_url(),
                published_at: item
                    .content_details
                    .video_published_at
                    .unwrap_or(item.snippet.published_at),
            })
            .collect();

        Ok(PlaylistPage {
            items,
            next_page_token: parsed.next_page_token,
        })
    }

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ProviderError> {
        let parsed: VideoListResponse = self
            .get_json(
                "videos",
                &[("part", "contentDetails,statistics"), ("id", video_id)],
            )
            .await?;

        Ok(parsed.items.into_iter().next().map(|video| VideoDetails {
            duration: video
                .content_details
                .map(|details| details.duration)
                .unwrap_or_default(),
            views_count: video.statistics.views(),
            likes_count: video.statistics.likes(),
        }))
    }

    async fn video_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<Vec<VideoStatistics>, ProviderError> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = video_ids.join(",");
        let parsed: VideoListResponse = self
            .get_json("videos", &[("part", "statistics"), ("id", ids.as_str())])
            .await?;

        Ok(parsed
            .items
            .into_iter()
            .map(|video| VideoStatistics {
                views_count: video.statistics.views(),
                likes_count: video.statistics.likes(),
                video_id: video.id,
            })
            .collect())
    }
}
