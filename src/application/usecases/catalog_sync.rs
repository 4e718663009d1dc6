use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    entities::videos::UpsertVideoEntity,
    repositories::{categories::CategoryRepository, videos::VideoRepository},
    value_objects::{
        catalog_sync::{PlaylistPage, ProviderError, VideoDetails, VideoStatistics},
        enums::category_kinds::CategoryKind,
    },
};

/// Page size for the uploads listing and the upper bound on ids per
/// statistics call, both imposed by the provider.
pub const PROVIDER_BATCH_SIZE: usize = 50;

pub const DEFAULT_STATS_WINDOW_DAYS: i64 = 7;

/// Read-only client for the upstream video-listing API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Resolves a channel to its "uploads" playlist id. `None` means the
    /// channel does not exist.
    async fn uploads_playlist_id(
        &self,
        channel_id: &str,
    ) -> Result<Option<String>, ProviderError>;

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<PlaylistPage, ProviderError>;

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ProviderError>;

    async fn video_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<Vec<VideoStatistics>, ProviderError>;
}

#[derive(Debug, Error)]
pub enum CatalogSyncError {
    #[error("malformed ISO-8601 duration: {0}")]
    MalformedDuration(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CatalogSyncError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CatalogSyncError::MalformedDuration(_) => StatusCode::BAD_GATEWAY,
            CatalogSyncError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Parses an ISO-8601 duration restricted to hours/minutes/seconds
/// ("PT1H2M3S") into total seconds. Components must appear in H, M, S order;
/// each is optional, and an empty duration (or a bare "PT") is zero seconds.
/// Anything reordered, non-numeric, or left over is a hard parse fault.
pub fn parse_iso8601_duration(raw: &str) -> Result<i32, CatalogSyncError> {
    if raw.is_empty() {
        return Ok(0);
    }

    let Some(mut rest) = raw.strip_prefix("PT") else {
        return Err(CatalogSyncError::MalformedDuration(raw.to_string()));
    };

    let mut total: i64 = 0;
    for (marker, scale) in [('H', 3600), ('M', 60), ('S', 1)] {
        if let Some(idx) = rest.find(marker) {
            let value: i64 = rest[..idx]
                .parse()
                .map_err(|_| CatalogSyncError::MalformedDuration(raw.to_string()))?;
            total += value * scale;
            rest = &rest[idx + 1..];
        }
    }

    if !rest.is_empty() {
        return Err(CatalogSyncError::MalformedDuration(raw.to_string()));
    }

    i32::try_from(total).map_err(|_| CatalogSyncError::MalformedDuration(raw.to_string()))
}

const PROGRAMMING_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "django",
    "programming",
    "code",
    "coding",
    "developer",
    "web development",
    "html",
    "css",
    "framework",
    "algorithm",
];

const ECOMMERCE_KEYWORDS: &[&str] = &[
    "ecommerce",
    "e-commerce",
    "online store",
    "shop",
    "marketplace",
    "shopify",
    "woocommerce",
    "amazon",
    "ebay",
    "selling online",
    "digital marketing",
];

const ENTERTAINMENT_KEYWORDS: &[&str] = &[
    "entertainment",
    "funny",
    "comedy",
    "movie",
    "music",
    "game",
    "gaming",
    "play",
    "fun",
];

fn keyword_hits(keywords: &[&str], title: &str, description: &str) -> usize {
    keywords
        .iter()
        .filter(|kw| title.contains(**kw) || description.contains(**kw))
        .count()
}

/// Scores the title and description against the fixed keyword lists. The
/// strictly highest count wins; ties above zero resolve to the first list in
/// declared order (programming, e-commerce, entertainment); no hits at all
/// falls back to Uncategorized.
pub fn determine_category(title: &str, description: &str) -> CategoryKind {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    let scores = [
        (
            CategoryKind::Programming,
            keyword_hits(PROGRAMMING_KEYWORDS, &title, &description),
        ),
        (
            CategoryKind::Ecommerce,
            keyword_hits(ECOMMERCE_KEYWORDS, &title, &description),
        ),
        (
            CategoryKind::Entertainment,
            keyword_hits(ENTERTAINMENT_KEYWORDS, &title, &description),
        ),
    ];

    let max_score = scores.iter().map(|(_, score)| *score).max().unwrap_or(0);
    if max_score == 0 {
        return CategoryKind::Uncategorized;
    }

    scores
        .iter()
        .find(|(_, score)| *score == max_score)
        .map(|(kind, _)| *kind)
        .unwrap_or(CategoryKind::Uncategorized)
}

pub struct CatalogSyncUseCase<P, V, C>
where
    P: VideoProvider + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    provider: Arc<P>,
    video_repository: Arc<V>,
    category_repository: Arc<C>,
}

impl<P, V, C> CatalogSyncUseCase<P, V, C>
where
    P: VideoProvider + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    pub fn new(provider: Arc<P>, video_repository: Arc<V>, category_repository: Arc<C>) -> Self {
        Self {
            provider,
            video_repository,
            category_repository,
        }
    }

    /// Pages through the channel's uploads, classifying and upserting each
    /// video keyed by its youtube id. Provider faults stop the loop and yield
    /// the partial count instead of an error; malformed durations do not.
    pub async fn sync_channel(&self, channel_id: &str) -> Result<u64, CatalogSyncError> {
        info!(channel_id, "catalog sync: starting channel sync");

        let category_ids = self
            .category_repository
            .ensure_seed_categories()
            .await
            .map_err(CatalogSyncError::Internal)?;

        let playlist_id = match self.provider.uploads_playlist_id(channel_id).await {
            Ok(Some(playlist_id)) => playlist_id,
            Ok(None) => {
                warn!(channel_id, "catalog sync: channel not found at provider");
                return Ok(0);
            }
            Err(err) => {
                warn!(
                    channel_id,
                    error = %err,
                    "catalog sync: provider fault before first page, nothing processed"
                );
                return Ok(0);
            }
        };

        let mut processed: u64 = 0;
        let mut page_token: Option<String> = None;

        loop {
            let page = match self
                .provider
                .playlist_page(&playlist_id, page_token.clone())
                .await
            {
                Ok(page) => page,
                Err(err) => {
                    warn!(
                        channel_id,
                        processed,
                        error = %err,
                        "catalog sync: provider fault, stopping early with partial count"
                    );
                    return Ok(processed);
                }
            };

            for item in page.items {
                let details = match self.provider.video_details(&item.video_id).await {
                    Ok(Some(details)) => details,
                    Ok(None) => continue,
                    Err(err) => {
                        warn!(
                            channel_id,
                            processed,
                            video_id = %item.video_id,
                            error = %err,
                            "catalog sync: provider fault, stopping early with partial count"
                        );
                        return Ok(processed);
                    }
                };

                let duration_seconds = parse_iso8601_duration(&details.duration)?;
                let kind = determine_category(&item.title, &item.description);
                let category_id = category_ids
                    .get(&kind)
                    .copied()
                    .ok_or_else(|| anyhow!("seed category {} is missing", kind))?;

                self.video_repository
                    .upsert_by_youtube_id(UpsertVideoEntity {
                        category_id,
                        youtube_id: item.video_id.clone(),
                        title: item.title,
                        description: item.description,
                        thumbnail_url: item.thumbnail_url,
                        duration_seconds: Some(duration_seconds),
                        publish_date: item.published_at,
                        views_count: details.views_count,
                        likes_count: details.likes_count,
                    })
                    .await
                    .map_err(CatalogSyncError::Internal)?;

                processed += 1;
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        info!(channel_id, processed, "catalog sync: channel sync finished");
        Ok(processed)
    }

    /// Re-fetches view/like counters for videos published within the trailing
    /// window, in provider-sized batches, updating counters in place.
    pub async fn refresh_recent_statistics(&self, days: i64) -> Result<u64, CatalogSyncError> {
        let cutoff = Utc::now() - Duration::days(days);
        let youtube_ids = self
            .video_repository
            .list_youtube_ids_published_since(cutoff)
            .await
            .map_err(CatalogSyncError::Internal)?;

        info!(
            days,
            candidates = youtube_ids.len(),
            "catalog sync: refreshing recent statistics"
        );

        let mut updated: u64 = 0;
        for batch in youtube_ids.chunks(PROVIDER_BATCH_SIZE) {
            let statistics = match self.provider.video_statistics(batch).await {
                Ok(statistics) => statistics,
                Err(err) => {
                    warn!(
                        updated,
                        error = %err,
                        "catalog sync: provider fault during stats refresh, partial count"
                    );
                    return Ok(updated);
                }
            };

            for stat in statistics {
                let exists = self
                    .video_repository
                    .update_statistics(&stat.video_id, stat.views_count, stat.likes_count)
                    .await
                    .map_err(CatalogSyncError::Internal)?;
                if exists {
                    updated += 1;
                }
            }
        }

        info!(updated, "catalog sync: statistics refresh finished");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::repositories::categories::MockCategoryRepository;
    use crate::domain::repositories::videos::MockVideoRepository;
    use crate::domain::value_objects::catalog_sync::PlaylistItem;

    #[test]
    fn parses_full_duration() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S").unwrap(), 3723);
    }

    #[test]
    fn parses_partial_durations() {
        assert_eq!(parse_iso8601_duration("PT45S").unwrap(), 45);
        assert_eq!(parse_iso8601_duration("PT10M").unwrap(), 600);
        assert_eq!(parse_iso8601_duration("PT2H").unwrap(), 7200);
        assert_eq!(parse_iso8601_duration("PT2H5S").unwrap(), 7205);
    }

    #[test]
    fn empty_duration_is_zero() {
        assert_eq!(parse_iso8601_duration("").unwrap(), 0);
        assert_eq!(parse_iso8601_duration("PT").unwrap(), 0);
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(parse_iso8601_duration("1H2M").is_err());
    }

    #[test]
    fn rejects_reordered_components() {
        assert!(parse_iso8601_duration("PT3S2M").is_err());
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert!(parse_iso8601_duration("PTxH").is_err());
        assert!(parse_iso8601_duration("PT1H2M3S4").is_err());
    }

    #[test]
    fn classifies_programming_title() {
        assert_eq!(
            determine_category("Learn Python basics", ""),
            CategoryKind::Programming
        );
    }

    #[test]
    fn no_keyword_hits_is_uncategorized() {
        assert_eq!(
            determine_category("Quarterly report walkthrough", "slides and notes"),
            CategoryKind::Uncategorized
        );
    }

    #[test]
    fn ties_resolve_in_declared_order() {
        // One programming hit and one e-commerce hit: programming is declared
        // first and wins the tie.
        assert_eq!(
            determine_category("", "a python guide to selling on ebay"),
            CategoryKind::Programming
        );
    }

    #[test]
    fn strictly_highest_score_wins() {
        assert_eq!(
            determine_category("funny gaming music", "python"),
            CategoryKind::Entertainment
        );
    }

    fn seed_map() -> HashMap<CategoryKind, Uuid> {
        CategoryKind::SEED
            .iter()
            .map(|kind| (*kind, Uuid::new_v4()))
            .collect()
    }

    fn playlist_item(video_id: &str, title: &str) -> PlaylistItem {
        PlaylistItem {
            video_id: video_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            thumbnail_url: "https://i.ytimg.com/vi/default.jpg".to_string(),
            published_at: Utc::now(),
        }
    }

    fn details(duration: &str) -> VideoDetails {
        VideoDetails {
            duration: duration.to_string(),
            views_count: 100,
            likes_count: 10,
        }
    }

    #[tokio::test]
    async fn sync_upserts_every_listed_video() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_uploads_playlist_id()
            .returning(|_| Ok(Some("UUabc".to_string())));
        provider.expect_playlist_page().returning(|_, _| {
            Ok(PlaylistPage {
                items: vec![
                    playlist_item("vid-1", "Learn Python basics"),
                    playlist_item("vid-2", "Movie night"),
                ],
                next_page_token: None,
            })
        });
        provider
            .expect_video_details()
            .returning(|_| Ok(Some(details("PT1H2M3S"))));

        let mut video_repository = MockVideoRepository::new();
        video_repository
            .expect_upsert_by_youtube_id()
            .times(2)
            .withf(|video| {
                video.duration_seconds == Some(3723)
                    && (video.youtube_id == "vid-1" || video.youtube_id == "vid-2")
            })
            .returning(|_| Ok(Uuid::new_v4()));

        let mut category_repository = MockCategoryRepository::new();
        category_repository
            .expect_ensure_seed_categories()
            .returning(|| Ok(seed_map()));

        let usecase = CatalogSyncUseCase::new(
            Arc::new(provider),
            Arc::new(video_repository),
            Arc::new(category_repository),
        );

        let processed = usecase.sync_channel("chan-1").await.unwrap();
        assert_eq!(processed, 2);
    }

    #[tokio::test]
    async fn provider_fault_mid_run_returns_partial_count() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_uploads_playlist_id()
            .returning(|_| Ok(Some("UUabc".to_string())));
        provider
            .expect_playlist_page()
            .returning(|_, page_token| match page_token {
                None => Ok(PlaylistPage {
                    items: vec![playlist_item("vid-1", "Learn Python basics")],
                    next_page_token: Some("page-2".to_string()),
                }),
                Some(_) => Err(ProviderError::Transport("connection reset".to_string())),
            });
        provider
            .expect_video_details()
            .returning(|_| Ok(Some(details("PT45S"))));

        let mut video_repository = MockVideoRepository::new();
        video_repository
            .expect_upsert_by_youtube_id()
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let mut category_repository = MockCategoryRepository::new();
        category_repository
            .expect_ensure_seed_categories()
            .returning(|| Ok(seed_map()));

        let usecase = CatalogSyncUseCase::new(
            Arc::new(provider),
            Arc::new(video_repository),
            Arc::new(category_repository),
        );

        let processed = usecase.sync_channel("chan-1").await.unwrap();
        assert_eq!(processed, 1);
    }

    #[tokio::test]
    async fn malformed_duration_is_a_hard_fault() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_uploads_playlist_id()
            .returning(|_| Ok(Some("UUabc".to_string())));
        provider.expect_playlist_page().returning(|_, _| {
            Ok(PlaylistPage {
                items: vec![playlist_item("vid-1", "Learn Python basics")],
                next_page_token: None,
            })
        });
        provider
            .expect_video_details()
            .returning(|_| Ok(Some(details("PT3S2M"))));

        let video_repository = MockVideoRepository::new();
        let mut category_repository = MockCategoryRepository::new();
        category_repository
            .expect_ensure_seed_categories()
            .returning(|| Ok(seed_map()));

        let usecase = CatalogSyncUseCase::new(
            Arc::new(provider),
            Arc::new(video_repository),
            Arc::new(category_repository),
        );

        let result = usecase.sync_channel("chan-1").await;
        assert!(matches!(
            result,
            Err(CatalogSyncError::MalformedDuration(_))
        ));
    }

    #[tokio::test]
    async fn unknown_channel_processes_nothing() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_uploads_playlist_id()
            .returning(|_| Ok(None));

        let video_repository = MockVideoRepository::new();
        let mut category_repository = MockCategoryRepository::new();
        category_repository
            .expect_ensure_seed_categories()
            .returning(|| Ok(seed_map()));

        let usecase = CatalogSyncUseCase::new(
            Arc::new(provider),
            Arc::new(video_repository),
            Arc::new(category_repository),
        );

        assert_eq!(usecase.sync_channel("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stats_refresh_updates_counters_in_place() {
        let mut provider = MockVideoProvider::new();
        provider.expect_video_statistics().returning(|ids| {
            Ok(ids
                .iter()
                .map(|id| VideoStatistics {
                    video_id: id.clone(),
                    views_count: 500,
                    likes_count: 50,
                })
                .collect())
        });

        let mut video_repository = MockVideoRepository::new();
        video_repository
            .expect_list_youtube_ids_published_since()
            .returning(|_| Ok(vec!["vid-1".to_string(), "vid-2".to_string()]));
        video_repository
            .expect_update_statistics()
            .times(2)
            .returning(|_, _, _| Ok(true));

        let category_repository = MockCategoryRepository::new();

        let usecase = CatalogSyncUseCase::new(
            Arc::new(provider),
            Arc::new(video_repository),
            Arc::new(category_repository),
        );

        let updated = usecase
            .refresh_recent_statistics(DEFAULT_STATS_WINDOW_DAYS)
            .await
            .unwrap();
        assert_eq!(updated, 2);
    }

    #[tokio::test]
    async fn stats_refresh_absorbs_provider_fault() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_video_statistics()
            .returning(|_| Err(ProviderError::Transport("timeout".to_string())));

        let mut video_repository = MockVideoRepository::new();
        video_repository
            .expect_list_youtube_ids_published_since()
            .returning(|_| Ok(vec!["vid-1".to_string()]));

        let category_repository = MockCategoryRepository::new();

        let usecase = CatalogSyncUseCase::new(
            Arc::new(provider),
            Arc::new(video_repository),
            Arc::new(category_repository),
        );

        assert_eq!(usecase.refresh_recent_statistics(7).await.unwrap(), 0);
    }
}
