use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    entities::interactions::{InsertBookmarkEntity, InsertVideoHistoryEntity},
    repositories::{interactions::InteractionRepository, videos::VideoRepository},
    value_objects::interactions::{
        BookmarkDto, BookmarkToggle, HistoryEntryDto, RecordWatchModel, ToggleBookmarkModel,
    },
};

const HISTORY_PAGE_SIZE: i64 = 10;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("video not found")]
    VideoNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl InteractionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            InteractionError::VideoNotFound => StatusCode::NOT_FOUND,
            InteractionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct InteractionUseCase<I, V>
where
    I: InteractionRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    interaction_repository: Arc<I>,
    video_repository: Arc<V>,
}

impl<I, V> InteractionUseCase<I, V>
where
    I: InteractionRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    pub fn new(interaction_repository: Arc<I>, video_repository: Arc<V>) -> Self {
        Self {
            interaction_repository,
            video_repository,
        }
    }

    /// Appends a watch-history record. History is append-only; repeat watches
    /// of the same video add new rows.
    pub async fn record_watch(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        model: RecordWatchModel,
    ) -> Result<Uuid, InteractionError> {
        self.ensure_video_exists(video_id).await?;

        let entry_id = self
            .interaction_repository
            .insert_history(InsertVideoHistoryEntity {
                user_id,
                video_id,
                watch_duration_seconds: model.watch_duration_seconds,
                completed: model.completed,
            })
            .await
            .map_err(InteractionError::Internal)?;

        Ok(entry_id)
    }

    pub async fn list_history(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<HistoryEntryDto>, InteractionError> {
        let entries = self
            .interaction_repository
            .list_history(user_id, HISTORY_PAGE_SIZE)
            .await
            .map_err(InteractionError::Internal)?;
        Ok(entries.into_iter().map(HistoryEntryDto::from).collect())
    }

    /// Adds the bookmark, or removes it when it already exists.
    pub async fn toggle_bookmark(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        model: ToggleBookmarkModel,
    ) -> Result<BookmarkToggle, InteractionError> {
        self.ensure_video_exists(video_id).await?;

        let toggle = self
            .interaction_repository
            .toggle_bookmark(InsertBookmarkEntity {
                user_id,
                video_id,
                note: model.note,
            })
            .await
            .map_err(InteractionError::Internal)?;

        info!(%user_id, %video_id, toggle = ?toggle, "interactions: bookmark toggled");
        Ok(toggle)
    }

    pub async fn list_bookmarks(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookmarkDto>, InteractionError> {
        let bookmarks = self
            .interaction_repository
            .list_bookmarks(user_id)
            .await
            .map_err(InteractionError::Internal)?;
        Ok(bookmarks.into_iter().map(BookmarkDto::from).collect())
    }

    async fn ensure_video_exists(&self, video_id: Uuid) -> Result<(), InteractionError> {
        self.video_repository
            .find_by_id(video_id)
            .await
            .map_err(InteractionError::Internal)?
            .ok_or(InteractionError::VideoNotFound)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::entities::videos::VideoEntity;
    use crate::domain::repositories::interactions::MockInteractionRepository;
    use crate::domain::repositories::videos::MockVideoRepository;

    fn video(id: Uuid) -> VideoEntity {
        VideoEntity {
            id,
            category_id: Uuid::new_v4(),
            subcategory_id: None,
            youtube_id: "vid-1".to_string(),
            title: "Learn Python basics".to_string(),
            description: String::new(),
            thumbnail_url: String::new(),
            duration_seconds: Some(45),
            publish_date: Utc::now(),
            views_count: 0,
            likes_count: 0,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn repeat_bookmark_toggles_off() {
        let video_id = Uuid::new_v4();
        let mut videos = MockVideoRepository::new();
        videos
            .expect_find_by_id()
            .returning(move |id| Ok(Some(video(id))));

        let mut interactions = MockInteractionRepository::new();
        let mut calls = 0;
        interactions
            .expect_toggle_bookmark()
            .times(2)
            .returning(move |_| {
                calls += 1;
                Ok(if calls == 1 {
                    BookmarkToggle::Added
                } else {
                    BookmarkToggle::Removed
                })
            });

        let usecase = InteractionUseCase::new(Arc::new(interactions), Arc::new(videos));
        let user_id = Uuid::new_v4();

        let first = usecase
            .toggle_bookmark(user_id, video_id, ToggleBookmarkModel::default())
            .await
            .unwrap();
        let second = usecase
            .toggle_bookmark(user_id, video_id, ToggleBookmarkModel::default())
            .await
            .unwrap();
        assert_eq!(first, BookmarkToggle::Added);
        assert_eq!(second, BookmarkToggle::Removed);
    }

    #[tokio::test]
    async fn watch_on_unknown_video_is_not_found() {
        let mut videos = MockVideoRepository::new();
        videos.expect_find_by_id().returning(|_| Ok(None));

        let interactions = MockInteractionRepository::new();
        let usecase = InteractionUseCase::new(Arc::new(interactions), Arc::new(videos));

        let result = usecase
            .record_watch(
                Uuid::new_v4(),
                Uuid::new_v4(),
                RecordWatchModel {
                    watch_duration_seconds: 30,
                    completed: false,
                },
            )
            .await;
        assert!(matches!(result, Err(InteractionError::VideoNotFound)));
    }
}
