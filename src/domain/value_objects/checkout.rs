use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{payment_methods::PaymentMethodEntity, plans::PlanEntity},
    value_objects::enums::order_statuses::OrderStatus,
};

#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
    pub price_minor: i32,
    pub duration_days: i32,
    pub features: Vec<String>,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        let features = value
            .features
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Self {
            id: value.id,
            name: value.name,
            code: value.code,
            description: value.description,
            price_minor: value.price_minor,
            duration_days: value.duration_days,
            features,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodDto {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
}

impl From<PaymentMethodEntity> for PaymentMethodDto {
    fn from(value: PaymentMethodEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            code: value.code,
            description: value.description,
        }
    }
}

/// Response to opening checkout for a plan: the pending order (created or
/// reused) plus what the client needs to render the payment step.
#[derive(Debug, Serialize)]
pub struct CheckoutSessionDto {
    pub order_id: Uuid,
    pub order_status: OrderStatus,
    pub amount_minor: i32,
    pub plan: PlanDto,
    pub payment_methods: Vec<PaymentMethodDto>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutDetailsModel {
    pub payment_method_code: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub billing_address: String,
    #[serde(default)]
    pub order_notes: String,
}

/// What a gateway hands back when a payment is initiated.
#[derive(Debug, Clone, Default)]
pub struct PaymentInitiation {
    /// Client token for client-side confirmation (intent-based gateways).
    pub client_secret: Option<String>,
    /// Approval URL the caller must be redirected to (redirect-based gateways).
    pub redirect_url: Option<String>,
    /// Provider transaction id assigned at creation time, if any.
    pub transaction_id: Option<String>,
    /// Status the order should move to immediately (offline gateways).
    pub immediate_status: Option<OrderStatus>,
}

/// Provider-specific confirmation data posted back by the client
/// (e.g. `payment_intent` for Stripe, `payer_id` for PayPal).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfirmationModel(pub HashMap<String, String>);

impl PaymentConfirmationModel {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// A provider webhook event whose signature has already been checked.
#[derive(Debug, Clone)]
pub struct PaymentEvent {
    pub event_type: String,
    pub object: serde_json::Value,
}

/// Evidence of a verified payment, recorded on the order.
#[derive(Debug, Clone)]
pub struct PaymentProof {
    pub transaction_id: Option<String>,
    pub details: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ProcessPaymentDto {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub redirect_url: Option<String>,
    pub client_secret: Option<String>,
    pub already_paid: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentDto {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub plan_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub auto_renew: bool,
}

impl From<crate::domain::entities::subscriptions::UserSubscriptionEntity> for SubscriptionDto {
    fn from(value: crate::domain::entities::subscriptions::UserSubscriptionEntity) -> Self {
        Self {
            id: value.id,
            plan_id: value.plan_id,
            order_id: value.order_id,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            is_active: value.is_active,
            auto_renew: value.auto_renew,
        }
    }
}
