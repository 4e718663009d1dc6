use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanRepository {
    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>>;

    async fn find_active_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;

    async fn find_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
}
