use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::payment_methods::PaymentMethodEntity;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentMethodRepository {
    async fn list_active(&self) -> Result<Vec<PaymentMethodEntity>>;

    async fn find_active_by_code(&self, code: &str) -> Result<Option<PaymentMethodEntity>>;

    async fn find_by_id(&self, payment_method_id: Uuid) -> Result<Option<PaymentMethodEntity>>;
}
