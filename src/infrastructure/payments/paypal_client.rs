use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

/// Minimal PayPal REST client (payments v1).
pub struct PaypalClient {
    http: reqwest::Client,
    mode: String,
    client_id: String,
    client_secret: String,
    return_url: String,
    cancel_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: String,
    state: String,
    #[serde(default)]
    links: Vec<PaymentLink>,
}

#[derive(Debug, Deserialize)]
struct PaymentLink {
    href: String,
    rel: String,
}

/// A created payment awaiting buyer approval.
#[derive(Debug, Clone)]
pub struct CreatedPayment {
    pub payment_id: String,
    pub approval_url: String,
}

/// Outcome of executing an approved payment.
#[derive(Debug, Clone)]
pub struct ExecutedPayment {
    pub payment_id: String,
    pub state: String,
}

impl ExecutedPayment {
    pub fn is_approved(&self) -> bool {
        self.state == "approved"
    }
}

impl PaypalClient {
    pub fn new(
        mode: String,
        client_id: String,
        client_secret: String,
        return_url: String,
        cancel_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            mode,
            client_id,
            client_secret,
            return_url,
            cancel_url,
        }
    }

    fn api_base(&self) -> &'static str {
        if self.mode == "live" {
            "https://api-m.paypal.com"
        } else {
            "https://api-m.sandbox.paypal.com"
        }
    }

    /// https://developer.paypal.com/api/rest/authentication/
    async fn access_token(&self) -> Result<String> {
        let resp = self
            .http
            .post(format!("{}/v1/oauth2/token", self.api_base()))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            error!(%status, "paypal token request failed");
            anyhow::bail!("PayPal token request failed (status {})", status);
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }

    /// Creates a redirect-approval payment for the order amount.
    pub async fn create_payment(
        &self,
        amount_minor: i32,
        currency: &str,
        order_id: Uuid,
    ) -> Result<CreatedPayment> {
        let token = self.access_token().await?;
        let amount = format!("{}.{:02}", amount_minor / 100, amount_minor % 100);

        let body = json!({
            "intent": "sale",
            "payer": { "payment_method": "paypal" },
            "redirect_urls": {
                "return_url": self.return_url,
                "cancel_url": self.cancel_url,
            },
            "transactions": [{
                "amount": { "total": amount, "currency": currency },
                "description": format!("Order {order_id}"),
                "custom": order_id.to_string(),
            }],
        });

        let resp = self
            .http
            .post(format!("{}/v1/payments/payment", self.api_base()))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(%status, response_body = %body, "paypal create payment failed");
            anyhow::bail!("PayPal create payment failed (status {})", status);
        }

        let payment: PaymentResponse = resp.json().await?;
        let approval_url = payment
            .links
            .into_iter()
            .find(|link| link.rel == "approval_url")
            .map(|link| link.href)
            .ok_or_else(|| anyhow::anyhow!("PayPal payment is missing an approval_url"))?;

        Ok(CreatedPayment {
            payment_id: payment.id,
            approval_url,
        })
    }

    /// Executes a payment the buyer has approved.
    pub async fn execute_payment(
        &self,
        payment_id: &str,
        payer_id: &str,
    ) -> Result<ExecutedPayment> {
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(format!(
                "{}/v1/payments/payment/{}/execute",
                self.api_base(),
                payment_id
            ))
            .bearer_auth(token)
            .json(&json!({ "payer_id": payer_id }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(%status, response_body = %body, "paypal execute payment failed");
            anyhow::bail!("PayPal execute payment failed (status {})", status);
        }

        let payment: PaymentResponse = resp.json().await?;
        Ok(ExecutedPayment {
            payment_id: payment.id,
            state: payment.state,
        })
    }
}
