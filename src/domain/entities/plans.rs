use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::subscription_plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_plans)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
    pub price_minor: i32,
    pub duration_days: i32,
    pub features: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
