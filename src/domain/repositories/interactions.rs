use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    entities::interactions::{
        BookmarkEntity, InsertBookmarkEntity, InsertVideoHistoryEntity, VideoHistoryEntity,
    },
    value_objects::interactions::BookmarkToggle,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionRepository {
    async fn insert_history(&self, entry: InsertVideoHistoryEntity) -> Result<Uuid>;

    async fn list_history(&self, user_id: Uuid, limit: i64) -> Result<Vec<VideoHistoryEntity>>;

    /// Bookmarks are unique per (user, video) and toggle on repeat action:
    /// removes the existing row if present, inserts otherwise.
    async fn toggle_bookmark(&self, bookmark: InsertBookmarkEntity) -> Result<BookmarkToggle>;

    async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<BookmarkEntity>>;
}
