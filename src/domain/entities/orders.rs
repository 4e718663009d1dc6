use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::orders;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = orders)]
pub struct OrderEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub status: String,
    pub amount_minor: i32,
    pub shipping_address: String,
    pub billing_address: String,
    pub order_notes: String,
    pub transaction_id: Option<String>,
    pub payment_details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct InsertOrderEntity {
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub status: String,
    pub amount_minor: i32,
}

/// Billing details confirmed at checkout, applied before payment dispatch.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderCheckoutChangeset {
    pub payment_method_id: Uuid,
    pub shipping_address: String,
    pub billing_address: String,
    pub order_notes: String,
    pub updated_at: DateTime<Utc>,
}
