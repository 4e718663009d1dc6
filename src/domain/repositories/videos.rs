use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::videos::{UpsertVideoEntity, VideoEntity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository {
    /// Create-or-update keyed by youtube_id. Returns the row id.
    async fn upsert_by_youtube_id(&self, video: UpsertVideoEntity) -> Result<Uuid>;

    /// Counters-only update used by the statistics refresh path. Returns
    /// whether a row with that youtube_id existed.
    async fn update_statistics(
        &self,
        youtube_id: &str,
        views_count: i64,
        likes_count: i64,
    ) -> Result<bool>;

    async fn list_youtube_ids_published_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>>;

    async fn find_by_id(&self, video_id: Uuid) -> Result<Option<VideoEntity>>;

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<VideoEntity>>;

    async fn list_related(
        &self,
        category_id: Uuid,
        exclude_video_id: Uuid,
        limit: i64,
    ) -> Result<Vec<VideoEntity>>;

    async fn list_featured(&self) -> Result<Vec<VideoEntity>>;
}
