use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    repositories::{categories::CategoryRepository, videos::VideoRepository},
    value_objects::catalog::{CategoryDetailDto, CategoryDto, VideoDetailDto, VideoDto},
};

const RELATED_VIDEOS_LIMIT: i64 = 5;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("category not found")]
    CategoryNotFound,
    #[error("video not found")]
    VideoNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CatalogError::CategoryNotFound | CatalogError::VideoNotFound => {
                StatusCode::NOT_FOUND
            }
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct CatalogUseCase<V, C>
where
    V: VideoRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    video_repository: Arc<V>,
    category_repository: Arc<C>,
}

impl<V, C> CatalogUseCase<V, C>
where
    V: VideoRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    pub fn new(video_repository: Arc<V>, category_repository: Arc<C>) -> Self {
        Self {
            video_repository,
            category_repository,
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryDto>, CatalogError> {
        let categories = self
            .category_repository
            .list()
            .await
            .map_err(CatalogError::Internal)?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    pub async fn category_detail(&self, slug: &str) -> Result<CategoryDetailDto, CatalogError> {
        let category = self
            .category_repository
            .find_by_slug(slug)
            .await
            .map_err(CatalogError::Internal)?
            .ok_or(CatalogError::CategoryNotFound)?;

        let videos = self
            .video_repository
            .list_by_category(category.id)
            .await
            .map_err(CatalogError::Internal)?;

        info!(slug, videos = videos.len(), "catalog: category detail loaded");

        Ok(CategoryDetailDto {
            category: CategoryDto::from(category),
            videos: videos.into_iter().map(VideoDto::from).collect(),
        })
    }

    pub async fn video_detail(&self, video_id: Uuid) -> Result<VideoDetailDto, CatalogError> {
        let video = self
            .video_repository
            .find_by_id(video_id)
            .await
            .map_err(CatalogError::Internal)?
            .ok_or(CatalogError::VideoNotFound)?;

        let related_videos = self
            .video_repository
            .list_related(video.category_id, video.id, RELATED_VIDEOS_LIMIT)
            .await
            .map_err(CatalogError::Internal)?;

        Ok(VideoDetailDto {
            video: VideoDto::from(video),
            related_videos: related_videos.into_iter().map(VideoDto::from).collect(),
        })
    }

    pub async fn featured_videos(&self) -> Result<Vec<VideoDto>, CatalogError> {
        let videos = self
            .video_repository
            .list_featured()
            .await
            .map_err(CatalogError::Internal)?;
        Ok(videos.into_iter().map(VideoDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::entities::videos::VideoEntity;
    use crate::domain::repositories::categories::MockCategoryRepository;
    use crate::domain::repositories::videos::MockVideoRepository;

    fn video(category_id: Uuid) -> VideoEntity {
        VideoEntity {
            id: Uuid::new_v4(),
            category_id,
            subcategory_id: None,
            youtube_id: "vid-1".to_string(),
            title: "Learn Python basics".to_string(),
            description: String::new(),
            thumbnail_url: String::new(),
            duration_seconds: Some(3723),
            publish_date: Utc::now(),
            views_count: 100,
            likes_count: 10,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn video_detail_excludes_itself_from_related() {
        let category_id = Uuid::new_v4();
        let subject = video(category_id);
        let subject_id = subject.id;

        let mut videos = MockVideoRepository::new();
        videos
            .expect_find_by_id()
            .returning(move |_| Ok(Some(subject.clone())));
        videos
            .expect_list_related()
            .withf(move |cat, exclude, limit| {
                *cat == category_id && *exclude == subject_id && *limit == RELATED_VIDEOS_LIMIT
            })
            .returning(move |cat, _, _| Ok(vec![video(cat)]));

        let categories = MockCategoryRepository::new();
        let usecase = CatalogUseCase::new(Arc::new(videos), Arc::new(categories));

        let detail = usecase.video_detail(subject_id).await.unwrap();
        assert_eq!(detail.video.id, subject_id);
        assert_eq!(detail.related_videos.len(), 1);
    }

    #[tokio::test]
    async fn unknown_video_is_not_found() {
        let mut videos = MockVideoRepository::new();
        videos.expect_find_by_id().returning(|_| Ok(None));

        let categories = MockCategoryRepository::new();
        let usecase = CatalogUseCase::new(Arc::new(videos), Arc::new(categories));

        let result = usecase.video_detail(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CatalogError::VideoNotFound)));
    }
}
