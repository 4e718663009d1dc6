use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{categories::CategoryEntity, videos::VideoEntity};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl From<CategoryEntity> for CategoryDto {
    fn from(value: CategoryEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            slug: value.slug,
            description: value.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoDto {
    pub id: Uuid,
    pub category_id: Uuid,
    pub youtube_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration_seconds: Option<i32>,
    pub publish_date: DateTime<Utc>,
    pub views_count: i64,
    pub likes_count: i64,
    pub featured: bool,
}

impl From<VideoEntity> for VideoDto {
    fn from(value: VideoEntity) -> Self {
        Self {
            id: value.id,
            category_id: value.category_id,
            youtube_id: value.youtube_id,
            title: value.title,
            description: value.description,
            thumbnail_url: value.thumbnail_url,
            duration_seconds: value.duration_seconds,
            publish_date: value.publish_date,
            views_count: value.views_count,
            likes_count: value.likes_count,
            featured: value.featured,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryDetailDto {
    pub category: CategoryDto,
    pub videos: Vec<VideoDto>,
}

#[derive(Debug, Serialize)]
pub struct VideoDetailDto {
    pub video: VideoDto,
    pub related_videos: Vec<VideoDto>,
}
