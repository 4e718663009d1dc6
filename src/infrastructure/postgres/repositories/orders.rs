use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::orders::{InsertOrderEntity, OrderCheckoutChangeset, OrderEntity},
        repositories::orders::OrderRepository,
        value_objects::enums::order_statuses::OrderStatus,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::orders},
};

pub struct OrderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OrderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OrderRepository for OrderPostgres {
    async fn find_or_create_pending(
        &self,
        insert_order: InsertOrderEntity,
    ) -> Result<OrderEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Rides the partial unique index on (user_id, plan_id) where
        // status = 'pending'. The no-op update makes RETURNING yield the
        // existing row on conflict.
        let order = insert_into(orders::table)
            .values(&insert_order)
            .on_conflict((orders::user_id, orders::plan_id))
            .filter_target(orders::status.eq(OrderStatus::Pending.as_str()))
            .do_update()
            .set(orders::updated_at.eq(Utc::now()))
            .returning(OrderEntity::as_returning())
            .get_result::<OrderEntity>(&mut conn)?;

        Ok(order)
    }

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = orders::table
            .find(order_id)
            .select(OrderEntity::as_select())
            .first::<OrderEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_id_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = orders::table
            .find(order_id)
            .filter(orders::user_id.eq(user_id))
            .select(OrderEntity::as_select())
            .first::<OrderEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn apply_checkout_details(
        &self,
        order_id: Uuid,
        changeset: OrderCheckoutChangeset,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(orders::table)
            .filter(orders::id.eq(order_id))
            .set(&changeset)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn set_transaction_id(&self, order_id: Uuid, transaction_id: &str) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(orders::table)
            .filter(orders::id.eq(order_id))
            .set((
                orders::transaction_id.eq(transaction_id),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn mark_processing(&self, order_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(orders::table)
            .filter(orders::id.eq(order_id))
            .filter(orders::status.eq(OrderStatus::Pending.as_str()))
            .set((
                orders::status.eq(OrderStatus::Processing.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(rows > 0)
    }

    async fn mark_paid(
        &self,
        order_id: Uuid,
        transaction_id: Option<String>,
        payment_details: serde_json::Value,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let now = Utc::now();
        let base = update(orders::table)
            .filter(orders::id.eq(order_id))
            .filter(orders::status.eq_any([
                OrderStatus::Pending.as_str(),
                OrderStatus::Processing.as_str(),
            ]));

        let rows = match transaction_id {
            Some(transaction_id) => base
                .set((
                    orders::status.eq(OrderStatus::Paid.as_str()),
                    orders::transaction_id.eq(transaction_id),
                    orders::payment_details.eq(payment_details),
                    orders::paid_at.eq(Some(now)),
                    orders::updated_at.eq(now),
                ))
                .execute(&mut conn)?,
            None => base
                .set((
                    orders::status.eq(OrderStatus::Paid.as_str()),
                    orders::payment_details.eq(payment_details),
                    orders::paid_at.eq(Some(now)),
                    orders::updated_at.eq(now),
                ))
                .execute(&mut conn)?,
        };

        Ok(rows > 0)
    }

    async fn cancel(&self, order_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(orders::table)
            .filter(orders::id.eq(order_id))
            .filter(orders::status.eq_any([
                OrderStatus::Pending.as_str(),
                OrderStatus::Processing.as_str(),
            ]))
            .set((
                orders::status.eq(OrderStatus::Cancelled.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(rows > 0)
    }
}
