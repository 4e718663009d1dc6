use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::{
        entities::payment_methods::PaymentMethodEntity,
        repositories::payment_methods::PaymentMethodRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::payment_methods},
};

pub struct PaymentMethodPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentMethodPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentMethodRepository for PaymentMethodPostgres {
    async fn list_active(&self) -> Result<Vec<PaymentMethodEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payment_methods::table
            .filter(payment_methods::is_active.eq(true))
            .order(payment_methods::sort_order.asc())
            .select(PaymentMethodEntity::as_select())
            .load::<PaymentMethodEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<PaymentMethodEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payment_methods::table
            .filter(payment_methods::code.eq(code))
            .filter(payment_methods::is_active.eq(true))
            .select(PaymentMethodEntity::as_select())
            .first::<PaymentMethodEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_id(&self, payment_method_id: Uuid) -> Result<Option<PaymentMethodEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payment_methods::table
            .find(payment_method_id)
            .select(PaymentMethodEntity::as_select())
            .first::<PaymentMethodEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
