use anyhow::Result;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::error;
use uuid::Uuid;

use crate::domain::value_objects::checkout::PaymentEvent;

type HmacSha256 = Hmac<Sha256>;

const API_BASE: &str = "https://api.stripe.com/v1";

/// Minimal Stripe client built on reqwest.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct StripeEventEnvelope {
    #[serde(rename = "type")]
    type_: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: String, webhook_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let (stripe_error_type, stripe_error_code, stripe_error_message) =
            match serde_json::from_str::<StripeErrorEnvelope>(&body) {
                Ok(envelope) => (
                    envelope.error.type_,
                    envelope.error.code,
                    envelope.error.message,
                ),
                Err(_) => (None, None, None),
            };

        error!(
            %status,
            stripe_error_type = ?stripe_error_type,
            stripe_error_code = ?stripe_error_code,
            stripe_error_message = ?stripe_error_message,
            context = %context,
            "stripe api request failed"
        );

        anyhow::bail!("Stripe API request failed: {} (status {})", context, status);
    }

    /// Creates a PaymentIntent for the order.
    /// https://stripe.com/docs/api/payment_intents/create
    pub async fn create_payment_intent(
        &self,
        amount_minor: i32,
        currency: &str,
        order_id: Uuid,
    ) -> Result<PaymentIntent> {
        let body = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("metadata[order_id]", order_id.to_string()),
        ];

        let resp = self
            .http
            .post(format!("{API_BASE}/payment_intents"))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create payment intent").await?;

        let intent: PaymentIntent = resp.json().await?;
        Ok(intent)
    }

    /// https://stripe.com/docs/api/payment_intents/retrieve
    pub async fn retrieve_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent> {
        let resp = self
            .http
            .get(format!("{API_BASE}/payment_intents/{intent_id}"))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "retrieve payment intent").await?;

        let intent: PaymentIntent = resp.json().await?;
        Ok(intent)
    }

    /// Verifies the webhook signature. https://stripe.com/docs/webhooks/signatures
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in stripe-signature"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in stripe-signature"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();
        let provided = hex::decode(signature)?;

        if expected[..] != provided[..] {
            anyhow::bail!("invalid webhook signature");
        }

        let envelope: StripeEventEnvelope = serde_json::from_slice(payload)?;
        Ok(PaymentEvent {
            event_type: envelope.type_,
            object: envelope.data.object,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_a_correctly_signed_webhook() {
        let client = StripeClient::new("sk_test".to_string(), "whsec_test".to_string());
        let payload =
            br#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_123"}}}"#;
        let signature = sign("whsec_test", "1700000000", payload);
        let header = format!("t=1700000000,v1={signature}");

        let event = client.verify_webhook_signature(payload, &header).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.object["id"], "pi_123");
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let client = StripeClient::new("sk_test".to_string(), "whsec_test".to_string());
        let payload =
            br#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_123"}}}"#;
        let signature = sign("whsec_test", "1700000000", payload);
        let header = format!("t=1700000000,v1={signature}");

        let tampered =
            br#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_999"}}}"#;
        assert!(client.verify_webhook_signature(tampered, &header).is_err());
    }

    #[test]
    fn rejects_a_header_without_signature_parts() {
        let client = StripeClient::new("sk_test".to_string(), "whsec_test".to_string());
        assert!(client.verify_webhook_signature(b"{}", "t=1700000000").is_err());
        assert!(client.verify_webhook_signature(b"{}", "v1=deadbeef").is_err());
    }
}
