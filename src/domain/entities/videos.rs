use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::videos;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = videos)]
pub struct VideoEntity {
    pub id: Uuid,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub youtube_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration_seconds: Option<i32>,
    pub publish_date: DateTime<Utc>,
    pub views_count: i64,
    pub likes_count: i64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the youtube_id-keyed upsert. `featured` is intentionally
/// absent so a re-sync never clears a manually featured video.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = videos)]
pub struct UpsertVideoEntity {
    pub category_id: Uuid,
    pub youtube_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration_seconds: Option<i32>,
    pub publish_date: DateTime<Utc>,
    pub views_count: i64,
    pub likes_count: i64,
}
