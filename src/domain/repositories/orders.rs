use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::orders::{InsertOrderEntity, OrderCheckoutChangeset, OrderEntity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository {
    /// Conflict-handling upsert against the partial unique index on
    /// (user_id, plan_id) where status = 'pending'. Two concurrent checkouts
    /// for the same (user, plan) resolve to the same pending order.
    async fn find_or_create_pending(&self, insert_order: InsertOrderEntity)
        -> Result<OrderEntity>;

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderEntity>>;

    async fn find_by_id_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OrderEntity>>;

    async fn apply_checkout_details(
        &self,
        order_id: Uuid,
        changeset: OrderCheckoutChangeset,
    ) -> Result<()>;

    async fn set_transaction_id(&self, order_id: Uuid, transaction_id: &str) -> Result<()>;

    /// Moves the order to `processing` only while it is still pending.
    /// Returns whether a row was updated.
    async fn mark_processing(&self, order_id: Uuid) -> Result<bool>;

    /// Gated paid-transition: applies only while the current status may still
    /// move to `paid` (pending or processing), making webhook redelivery
    /// idempotent and leaving terminal orders untouched. Returns whether a
    /// row was updated.
    async fn mark_paid(
        &self,
        order_id: Uuid,
        transaction_id: Option<String>,
        payment_details: serde_json::Value,
    ) -> Result<bool>;

    /// Cancels from any non-terminal status. Returns whether a row was updated.
    async fn cancel(&self, order_id: Uuid) -> Result<bool>;
}
