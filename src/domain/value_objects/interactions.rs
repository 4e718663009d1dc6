use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::interactions::{BookmarkEntity, VideoHistoryEntity};

#[derive(Debug, Deserialize)]
pub struct RecordWatchModel {
    pub watch_duration_seconds: i32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct ToggleBookmarkModel {
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkToggle {
    Added,
    Removed,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryDto {
    pub id: Uuid,
    pub video_id: Uuid,
    pub watch_duration_seconds: i32,
    pub completed: bool,
    pub watched_at: DateTime<Utc>,
}

impl From<VideoHistoryEntity> for HistoryEntryDto {
    fn from(value: VideoHistoryEntity) -> Self {
        Self {
            id: value.id,
            video_id: value.video_id,
            watch_duration_seconds: value.watch_duration_seconds,
            completed: value.completed,
            watched_at: value.watched_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookmarkDto {
    pub id: Uuid,
    pub video_id: Uuid,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookmarkEntity> for BookmarkDto {
    fn from(value: BookmarkEntity) -> Self {
        Self {
            id: value.id,
            video_id: value.video_id,
            note: value.note,
            created_at: value.created_at,
        }
    }
}
