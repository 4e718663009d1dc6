use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{delete, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::interactions::{
            BookmarkEntity, InsertBookmarkEntity, InsertVideoHistoryEntity, VideoHistoryEntity,
        },
        repositories::interactions::InteractionRepository,
        value_objects::interactions::BookmarkToggle,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{bookmarks, video_history},
    },
};

pub struct InteractionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InteractionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InteractionRepository for InteractionPostgres {
    async fn insert_history(&self, entry: InsertVideoHistoryEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let entry_id = insert_into(video_history::table)
            .values(&entry)
            .returning(video_history::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(entry_id)
    }

    async fn list_history(&self, user_id: Uuid, limit: i64) -> Result<Vec<VideoHistoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = video_history::table
            .filter(video_history::user_id.eq(user_id))
            .order(video_history::watched_at.desc())
            .limit(limit)
            .select(VideoHistoryEntity::as_select())
            .load::<VideoHistoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn toggle_bookmark(&self, bookmark: InsertBookmarkEntity) -> Result<BookmarkToggle> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let toggle = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let removed = delete(bookmarks::table)
                .filter(bookmarks::user_id.eq(bookmark.user_id))
                .filter(bookmarks::video_id.eq(bookmark.video_id))
                .execute(conn)?;

            if removed > 0 {
                return Ok(BookmarkToggle::Removed);
            }

            insert_into(bookmarks::table)
                .values(&bookmark)
                .execute(conn)?;

            Ok(BookmarkToggle::Added)
        })?;

        Ok(toggle)
    }

    async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<BookmarkEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .order(bookmarks::created_at.desc())
            .select(BookmarkEntity::as_select())
            .load::<BookmarkEntity>(&mut conn)?;

        Ok(results)
    }
}
