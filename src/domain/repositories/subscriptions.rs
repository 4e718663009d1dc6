use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    InsertUserSubscriptionEntity, UserSubscriptionEntity,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository {
    /// Deactivates any currently active subscription rows for the user and
    /// inserts the new active one, in a single transaction. At most one active
    /// subscription per user survives.
    async fn replace_active_subscription(
        &self,
        insert_subscription: InsertUserSubscriptionEntity,
    ) -> Result<UserSubscriptionEntity>;

    async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserSubscriptionEntity>>;
}
