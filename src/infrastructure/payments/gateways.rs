use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::{
    application::usecases::checkout::{PaymentGateway, WebhookVerifier},
    domain::{
        entities::orders::OrderEntity,
        value_objects::{
            checkout::{PaymentConfirmationModel, PaymentEvent, PaymentInitiation, PaymentProof},
            enums::order_statuses::OrderStatus,
        },
    },
    infrastructure::payments::{paypal_client::PaypalClient, stripe_client::StripeClient},
};

const CURRENCY: &str = "EUR";

pub struct StripePaymentGateway {
    client: Arc<StripeClient>,
}

impl StripePaymentGateway {
    pub fn new(client: Arc<StripeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn process_payment(&self, order: &OrderEntity) -> Result<PaymentInitiation> {
        let intent = self
            .client
            .create_payment_intent(order.amount_minor, &CURRENCY.to_lowercase(), order.id)
            .await?;

        Ok(PaymentInitiation {
            client_secret: intent.client_secret,
            transaction_id: Some(intent.id),
            ..Default::default()
        })
    }

    async fn verify_payment(
        &self,
        order: &OrderEntity,
        confirmation: &PaymentConfirmationModel,
    ) -> Result<Option<PaymentProof>> {
        let intent_id = confirmation
            .get("payment_intent")
            .or(order.transaction_id.as_deref())
            .ok_or_else(|| anyhow::anyhow!("no payment intent to verify"))?;

        let intent = self.client.retrieve_payment_intent(intent_id).await?;
        if intent.status != "succeeded" {
            info!(order_id = %order.id, status = %intent.status, "stripe payment not confirmed");
            return Ok(None);
        }

        Ok(Some(PaymentProof {
            transaction_id: Some(intent.id),
            details: json!({ "stripe_status": intent.status }),
        }))
    }
}

pub struct PaypalPaymentGateway {
    client: Arc<PaypalClient>,
}

impl PaypalPaymentGateway {
    pub fn new(client: Arc<PaypalClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentGateway for PaypalPaymentGateway {
    async fn process_payment(&self, order: &OrderEntity) -> Result<PaymentInitiation> {
        let created = self
            .client
            .create_payment(order.amount_minor, CURRENCY, order.id)
            .await?;

        Ok(PaymentInitiation {
            redirect_url: Some(created.approval_url),
            transaction_id: Some(created.payment_id),
            ..Default::default()
        })
    }

    async fn verify_payment(
        &self,
        order: &OrderEntity,
        confirmation: &PaymentConfirmationModel,
    ) -> Result<Option<PaymentProof>> {
        // PayPal's redirect back carries the payer id as "PayerID".
        let payer_id = confirmation
            .get("PayerID")
            .ok_or_else(|| anyhow::anyhow!("missing PayerID in confirmation"))?;
        let payment_id = order
            .transaction_id
            .as_deref()
            .or(confirmation.get("paymentId"))
            .ok_or_else(|| anyhow::anyhow!("no payment id to execute"))?;

        let executed = self.client.execute_payment(payment_id, payer_id).await?;
        if !executed.is_approved() {
            info!(order_id = %order.id, state = %executed.state, "paypal payment not approved");
            return Ok(None);
        }

        Ok(Some(PaymentProof {
            transaction_id: Some(executed.payment_id),
            details: json!({ "paypal_state": executed.state }),
        }))
    }
}

/// Offline gateway: no provider round-trip, the order goes straight to
/// `processing` and is settled manually on delivery.
pub struct CashOnDeliveryGateway;

#[async_trait]
impl PaymentGateway for CashOnDeliveryGateway {
    async fn process_payment(&self, _order: &OrderEntity) -> Result<PaymentInitiation> {
        Ok(PaymentInitiation {
            immediate_status: Some(OrderStatus::Processing),
            ..Default::default()
        })
    }

    async fn verify_payment(
        &self,
        _order: &OrderEntity,
        _confirmation: &PaymentConfirmationModel,
    ) -> Result<Option<PaymentProof>> {
        // Nothing to confirm online.
        Ok(None)
    }
}

impl WebhookVerifier for StripeClient {
    fn verify(&self, payload: &[u8], signature_header: &str) -> Result<PaymentEvent> {
        self.verify_webhook_signature(payload, signature_header)
    }
}

/// Builds the gateway registry keyed by payment-method code.
pub fn payment_gateways(
    stripe: Arc<StripeClient>,
    paypal: Arc<PaypalClient>,
) -> HashMap<String, Arc<dyn PaymentGateway>> {
    let mut gateways: HashMap<String, Arc<dyn PaymentGateway>> = HashMap::new();
    gateways.insert(
        "stripe".to_string(),
        Arc::new(StripePaymentGateway::new(stripe)),
    );
    gateways.insert(
        "paypal".to_string(),
        Arc::new(PaypalPaymentGateway::new(paypal)),
    );
    gateways.insert("cod".to_string(), Arc::new(CashOnDeliveryGateway));
    gateways
}
