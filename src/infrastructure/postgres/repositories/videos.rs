use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::videos::{UpsertVideoEntity, VideoEntity},
        repositories::videos::VideoRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::videos},
};

pub struct VideoPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl VideoPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VideoRepository for VideoPostgres {
    async fn upsert_by_youtube_id(&self, video: UpsertVideoEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let video_id = insert_into(videos::table)
            .values(&video)
            .on_conflict(videos::youtube_id)
            .do_update()
            .set((&video, videos::updated_at.eq(Utc::now())))
            .returning(videos::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(video_id)
    }

    async fn update_statistics(
        &self,
        youtube_id: &str,
        views_count: i64,
        likes_count: i64,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(videos::table)
            .filter(videos::youtube_id.eq(youtube_id))
            .set((
                videos::views_count.eq(views_count),
                videos::likes_count.eq(likes_count),
                videos::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(rows > 0)
    }

    async fn list_youtube_ids_published_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = videos::table
            .filter(videos::publish_date.ge(cutoff))
            .order(videos::publish_date.desc())
            .select(videos::youtube_id)
            .load::<String>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, video_id: Uuid) -> Result<Option<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = videos::table
            .find(video_id)
            .select(VideoEntity::as_select())
            .first::<VideoEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = videos::table
            .filter(videos::category_id.eq(category_id))
            .order(videos::publish_date.desc())
            .select(VideoEntity::as_select())
            .load::<VideoEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_related(
        &self,
        category_id: Uuid,
        exclude_video_id: Uuid,
        limit: i64,
    ) -> Result<Vec<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = videos::table
            .filter(videos::category_id.eq(category_id))
            .filter(videos::id.ne(exclude_video_id))
            .order(videos::publish_date.desc())
            .limit(limit)
            .select(VideoEntity::as_select())
            .load::<VideoEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_featured(&self) -> Result<Vec<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = videos::table
            .filter(videos::featured.eq(true))
            .order(videos::publish_date.desc())
            .select(VideoEntity::as_select())
            .load::<VideoEntity>(&mut conn)?;

        Ok(results)
    }
}
