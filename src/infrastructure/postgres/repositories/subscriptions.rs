use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{InsertUserSubscriptionEntity, UserSubscriptionEntity},
        repositories::subscriptions::SubscriptionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::user_subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn replace_active_subscription(
        &self,
        insert_subscription: InsertUserSubscriptionEntity,
    ) -> Result<UserSubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            update(user_subscriptions::table)
                .filter(user_subscriptions::user_id.eq(insert_subscription.user_id))
                .filter(user_subscriptions::is_active.eq(true))
                .set((
                    user_subscriptions::is_active.eq(false),
                    user_subscriptions::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            insert_into(user_subscriptions::table)
                .values(&insert_subscription)
                .returning(UserSubscriptionEntity::as_returning())
                .get_result::<UserSubscriptionEntity>(conn)
        })?;

        Ok(subscription)
    }

    async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserSubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = user_subscriptions::table
            .filter(user_subscriptions::user_id.eq(user_id))
            .filter(user_subscriptions::is_active.eq(true))
            .filter(user_subscriptions::ends_at.gt(Utc::now()))
            .order(user_subscriptions::ends_at.desc())
            .select(UserSubscriptionEntity::as_select())
            .first::<UserSubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
