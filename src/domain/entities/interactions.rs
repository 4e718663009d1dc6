use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{bookmarks, video_history};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = video_history)]
pub struct VideoHistoryEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub watch_duration_seconds: i32,
    pub completed: bool,
    pub watched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = video_history)]
pub struct InsertVideoHistoryEntity {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub watch_duration_seconds: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookmarks)]
pub struct BookmarkEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookmarks)]
pub struct InsertBookmarkEntity {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub note: String,
}
