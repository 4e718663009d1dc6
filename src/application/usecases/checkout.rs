use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result as AnyResult, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        orders::{InsertOrderEntity, OrderCheckoutChangeset, OrderEntity},
        subscriptions::InsertUserSubscriptionEntity,
    },
    repositories::{
        orders::OrderRepository, payment_methods::PaymentMethodRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::{
        checkout::{
            CheckoutDetailsModel, CheckoutSessionDto, PaymentConfirmationModel, PaymentEvent,
            PaymentInitiation, PaymentMethodDto, PaymentProof, PlanDto, ProcessPaymentDto,
            SubscriptionDto, VerifyPaymentDto,
        },
        enums::order_statuses::OrderStatus,
    },
};

/// Strategy interface over the payment backends. One implementation per
/// payment-method code; resolved from a registry at dispatch time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process_payment(&self, order: &OrderEntity) -> AnyResult<PaymentInitiation>;

    /// Returns proof of payment when the provider confirms the order, `None`
    /// when it does not (declined, unknown, still pending).
    async fn verify_payment(
        &self,
        order: &OrderEntity,
        confirmation: &PaymentConfirmationModel,
    ) -> AnyResult<Option<PaymentProof>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait WebhookVerifier: Send + Sync {
    fn verify(&self, payload: &[u8], signature_header: &str) -> AnyResult<PaymentEvent>;
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("payment method not available")]
    PaymentMethodNotAvailable,
    #[error("no payment gateway for this payment method")]
    GatewayNotAvailable,
    #[error("payment failed: {0}")]
    Gateway(String),
    #[error("order is already finalized")]
    InvalidTransition,
    #[error("invalid webhook payload: {0}")]
    InvalidWebhook(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CheckoutError::PlanNotFound | CheckoutError::OrderNotFound => StatusCode::NOT_FOUND,
            CheckoutError::PaymentMethodNotAvailable
            | CheckoutError::GatewayNotAvailable
            | CheckoutError::InvalidWebhook(_) => StatusCode::BAD_REQUEST,
            CheckoutError::InvalidTransition => StatusCode::CONFLICT,
            CheckoutError::Gateway(_) => StatusCode::BAD_GATEWAY,
            CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type CheckoutResult<T> = std::result::Result<T, CheckoutError>;

pub struct CheckoutUseCase<P, M, O, S>
where
    P: PlanRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_repository: Arc<P>,
    payment_method_repository: Arc<M>,
    order_repository: Arc<O>,
    subscription_repository: Arc<S>,
    gateways: HashMap<String, Arc<dyn PaymentGateway>>,
    webhook_verifier: Arc<dyn WebhookVerifier>,
}

impl<P, M, O, S> CheckoutUseCase<P, M, O, S>
where
    P: PlanRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(
        plan_repository: Arc<P>,
        payment_method_repository: Arc<M>,
        order_repository: Arc<O>,
        subscription_repository: Arc<S>,
        gateways: HashMap<String, Arc<dyn PaymentGateway>>,
        webhook_verifier: Arc<dyn WebhookVerifier>,
    ) -> Self {
        Self {
            plan_repository,
            payment_method_repository,
            order_repository,
            subscription_repository,
            gateways,
            webhook_verifier,
        }
    }

    pub async fn list_plans(&self) -> CheckoutResult<Vec<PlanDto>> {
        let plans = self
            .plan_repository
            .list_active_plans()
            .await
            .map_err(CheckoutError::Internal)?;
        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    pub async fn current_subscription(
        &self,
        user_id: Uuid,
    ) -> CheckoutResult<Option<SubscriptionDto>> {
        let subscription = self
            .subscription_repository
            .find_active_for_user(user_id)
            .await
            .map_err(CheckoutError::Internal)?;
        Ok(subscription.map(SubscriptionDto::from))
    }

    /// Opens checkout for a plan: finds or creates the pending order for
    /// (user, plan). Invoked twice before payment completes, the same pending
    /// order is returned.
    pub async fn start_checkout(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> CheckoutResult<CheckoutSessionDto> {
        info!(%user_id, %plan_id, "checkout: opening checkout session");

        let plan = self
            .plan_repository
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::PlanNotFound)?;

        let order = self
            .order_repository
            .find_or_create_pending(InsertOrderEntity {
                user_id,
                plan_id: Some(plan.id),
                status: OrderStatus::Pending.to_string(),
                amount_minor: plan.price_minor,
            })
            .await
            .map_err(CheckoutError::Internal)?;

        let payment_methods = self
            .payment_method_repository
            .list_active()
            .await
            .map_err(CheckoutError::Internal)?;

        let order_status = Self::order_status(&order)?;

        Ok(CheckoutSessionDto {
            order_id: order.id,
            order_status,
            amount_minor: order.amount_minor,
            plan: PlanDto::from(plan),
            payment_methods: payment_methods
                .into_iter()
                .map(PaymentMethodDto::from)
                .collect(),
        })
    }

    /// Confirms payment method and billing details on a still-pending order.
    /// Validation faults leave the order untouched.
    pub async fn submit_checkout(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        details: CheckoutDetailsModel,
    ) -> CheckoutResult<()> {
        let order = self.load_order_for_user(order_id, user_id).await?;
        let status = Self::order_status(&order)?;
        if status != OrderStatus::Pending {
            warn!(
                %order_id,
                status = %status,
                "checkout: details submitted for a non-pending order"
            );
            return Err(CheckoutError::InvalidTransition);
        }

        let payment_method = self
            .payment_method_repository
            .find_active_by_code(&details.payment_method_code)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::PaymentMethodNotAvailable)?;

        self.order_repository
            .apply_checkout_details(
                order.id,
                OrderCheckoutChangeset {
                    payment_method_id: payment_method.id,
                    shipping_address: details.shipping_address,
                    billing_address: details.billing_address,
                    order_notes: details.order_notes,
                    updated_at: Utc::now(),
                },
            )
            .await
            .map_err(CheckoutError::Internal)?;

        info!(%order_id, method = %payment_method.code, "checkout: details confirmed");
        Ok(())
    }

    /// Dispatches the order to its payment gateway. An already-paid order is
    /// a side-effect-free success; a gateway fault leaves the order in its
    /// prior status.
    pub async fn process_payment(
        &self,
        user_id: Uuid,
        order_id: Uuid,
    ) -> CheckoutResult<ProcessPaymentDto> {
        let order = self.load_order_for_user(order_id, user_id).await?;
        let status = Self::order_status(&order)?;

        if status == OrderStatus::Paid {
            info!(%order_id, "checkout: order already paid, nothing to process");
            return Ok(ProcessPaymentDto {
                order_id: order.id,
                status: OrderStatus::Paid,
                redirect_url: None,
                client_secret: None,
                already_paid: true,
            });
        }

        if status.is_terminal() {
            warn!(%order_id, status = %status, "checkout: payment attempted on a closed order");
            return Err(CheckoutError::InvalidTransition);
        }

        let gateway = self.resolve_gateway(&order).await?;

        let initiation = gateway.process_payment(&order).await.map_err(|err| {
            error!(%order_id, error = %err, "checkout: gateway rejected the payment");
            CheckoutError::Gateway(err.to_string())
        })?;

        if let Some(transaction_id) = initiation.transaction_id.as_deref() {
            self.order_repository
                .set_transaction_id(order.id, transaction_id)
                .await
                .map_err(CheckoutError::Internal)?;
        }

        let mut status_after = status;
        if initiation.immediate_status == Some(OrderStatus::Processing)
            && self
                .order_repository
                .mark_processing(order.id)
                .await
                .map_err(CheckoutError::Internal)?
        {
            status_after = OrderStatus::Processing;
        }

        info!(
            %order_id,
            status = %status_after,
            redirect = initiation.redirect_url.is_some(),
            "checkout: payment dispatched"
        );

        Ok(ProcessPaymentDto {
            order_id: order.id,
            status: status_after,
            redirect_url: initiation.redirect_url,
            client_secret: initiation.client_secret,
            already_paid: false,
        })
    }

    /// Synchronous confirmation path. Re-verifying an already-paid order is a
    /// no-op returning success.
    pub async fn verify_payment(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        confirmation: PaymentConfirmationModel,
    ) -> CheckoutResult<VerifyPaymentDto> {
        let order = self.load_order_for_user(order_id, user_id).await?;
        let status = Self::order_status(&order)?;

        if status == OrderStatus::Paid {
            info!(%order_id, "checkout: order already paid, verification is a no-op");
            return Ok(VerifyPaymentDto {
                order_id: order.id,
                status: OrderStatus::Paid,
                verified: true,
            });
        }

        if !status.can_transition_to(OrderStatus::Paid) {
            warn!(%order_id, status = %status, "checkout: verification attempted on a closed order");
            return Err(CheckoutError::InvalidTransition);
        }

        let gateway = self.resolve_gateway(&order).await?;

        let proof = gateway
            .verify_payment(&order, &confirmation)
            .await
            .map_err(|err| {
                error!(%order_id, error = %err, "checkout: gateway verification fault");
                CheckoutError::Gateway(err.to_string())
            })?;

        let Some(proof) = proof else {
            warn!(%order_id, "checkout: payment not confirmed by provider");
            return Ok(VerifyPaymentDto {
                order_id: order.id,
                status,
                verified: false,
            });
        };

        self.finalize_paid_order(&order, proof).await?;

        Ok(VerifyPaymentDto {
            order_id: order.id,
            status: OrderStatus::Paid,
            verified: true,
        })
    }

    /// Explicit user cancel. Allowed from any non-terminal status; no
    /// compensating call is made against the provider.
    pub async fn cancel_order(&self, user_id: Uuid, order_id: Uuid) -> CheckoutResult<()> {
        let order = self.load_order_for_user(order_id, user_id).await?;
        let status = Self::order_status(&order)?;
        if status.is_terminal() {
            return Err(CheckoutError::InvalidTransition);
        }

        let cancelled = self
            .order_repository
            .cancel(order.id)
            .await
            .map_err(CheckoutError::Internal)?;
        if !cancelled {
            return Err(CheckoutError::InvalidTransition);
        }

        info!(%order_id, "checkout: order cancelled");
        Ok(())
    }

    /// Asynchronous confirmation path. Redelivery of the same succeeded event
    /// is idempotent: the paid-transition is gated on the current status.
    pub async fn handle_stripe_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> CheckoutResult<()> {
        let event = self
            .webhook_verifier
            .verify(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "checkout: webhook signature verification failed");
                CheckoutError::InvalidWebhook("signature verification failed".to_string())
            })?;

        if event.event_type != "payment_intent.succeeded" {
            debug!(event_type = %event.event_type, "checkout: ignoring webhook event type");
            return Ok(());
        }

        #[derive(Deserialize)]
        struct IntentObject {
            id: Option<String>,
            #[serde(default)]
            metadata: HashMap<String, String>,
        }

        let intent: IntentObject = serde_json::from_value(event.object).map_err(|err| {
            warn!(error = %err, "checkout: malformed intent payload in webhook");
            CheckoutError::InvalidWebhook("malformed payment intent payload".to_string())
        })?;

        let order_id = intent
            .metadata
            .get("order_id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| {
                CheckoutError::InvalidWebhook("missing order_id in intent metadata".to_string())
            })?;

        let order = self
            .order_repository
            .find_by_id(order_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::OrderNotFound)?;

        let status = Self::order_status(&order)?;
        if status == OrderStatus::Paid {
            info!(%order_id, "checkout: webhook redelivery for paid order, ignoring");
            return Ok(());
        }
        if !status.can_transition_to(OrderStatus::Paid) {
            // Acknowledge so the provider stops redelivering; a closed order
            // is never reopened.
            warn!(%order_id, status = %status, "checkout: succeeded event for a closed order, ignoring");
            return Ok(());
        }

        let proof = PaymentProof {
            transaction_id: intent.id,
            details: serde_json::json!({ "stripe_status": "succeeded" }),
        };
        self.finalize_paid_order(&order, proof).await?;

        info!(%order_id, "checkout: order paid via webhook");
        Ok(())
    }

    /// Applies the gated paid-transition and, when it actually happened,
    /// provisions the plan subscription for the order window.
    async fn finalize_paid_order(
        &self,
        order: &OrderEntity,
        proof: PaymentProof,
    ) -> CheckoutResult<()> {
        let transitioned = self
            .order_repository
            .mark_paid(order.id, proof.transaction_id, proof.details)
            .await
            .map_err(CheckoutError::Internal)?;

        if !transitioned {
            info!(order_id = %order.id, "checkout: paid-transition already applied");
            return Ok(());
        }

        self.provision_subscription(order).await
    }

    async fn provision_subscription(&self, order: &OrderEntity) -> CheckoutResult<()> {
        let Some(plan_id) = order.plan_id else {
            warn!(order_id = %order.id, "checkout: paid order has no plan, nothing to provision");
            return Ok(());
        };

        let plan = self
            .plan_repository
            .find_plan_by_id(plan_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or_else(|| anyhow!("plan {} missing for paid order {}", plan_id, order.id))?;

        let starts_at = Utc::now();
        let ends_at = starts_at + Duration::days(plan.duration_days.into());

        let subscription = self
            .subscription_repository
            .replace_active_subscription(InsertUserSubscriptionEntity {
                user_id: order.user_id,
                plan_id: Some(plan.id),
                order_id: Some(order.id),
                starts_at,
                ends_at,
                is_active: true,
                auto_renew: false,
            })
            .await
            .map_err(CheckoutError::Internal)?;

        info!(
            order_id = %order.id,
            subscription_id = %subscription.id,
            ends_at = %subscription.ends_at,
            "checkout: subscription provisioned"
        );
        Ok(())
    }

    async fn load_order_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> CheckoutResult<OrderEntity> {
        self.order_repository
            .find_by_id_for_user(order_id, user_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::OrderNotFound)
    }

    async fn resolve_gateway(
        &self,
        order: &OrderEntity,
    ) -> CheckoutResult<Arc<dyn PaymentGateway>> {
        let payment_method_id = order
            .payment_method_id
            .ok_or(CheckoutError::PaymentMethodNotAvailable)?;

        let payment_method = self
            .payment_method_repository
            .find_by_id(payment_method_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::PaymentMethodNotAvailable)?;

        if !payment_method.is_active {
            return Err(CheckoutError::PaymentMethodNotAvailable);
        }

        self.gateways
            .get(&payment_method.code)
            .cloned()
            .ok_or(CheckoutError::GatewayNotAvailable)
    }

    fn order_status(order: &OrderEntity) -> CheckoutResult<OrderStatus> {
        OrderStatus::from_str(&order.status)
            .ok_or_else(|| anyhow!("order {} has unknown status '{}'", order.id, order.status).into())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::entities::{
        payment_methods::PaymentMethodEntity, plans::PlanEntity,
        subscriptions::UserSubscriptionEntity,
    };
    use crate::domain::repositories::{
        orders::MockOrderRepository, payment_methods::MockPaymentMethodRepository,
        plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
    };

    fn plan(duration_days: i32) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: "Premium".to_string(),
            code: "premium".to_string(),
            description: "Full catalog access".to_string(),
            price_minor: 1999,
            duration_days,
            features: "All videos\nDownloadable resources".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn order(status: OrderStatus) -> OrderEntity {
        OrderEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: Some(Uuid::new_v4()),
            payment_method_id: Some(Uuid::new_v4()),
            status: status.to_string(),
            amount_minor: 1999,
            shipping_address: String::new(),
            billing_address: String::new(),
            order_notes: String::new(),
            transaction_id: None,
            payment_details: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            paid_at: None,
        }
    }

    fn payment_method(code: &str) -> PaymentMethodEntity {
        PaymentMethodEntity {
            id: Uuid::new_v4(),
            name: code.to_string(),
            code: code.to_string(),
            description: String::new(),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    fn subscription_from(insert: &InsertUserSubscriptionEntity) -> UserSubscriptionEntity {
        UserSubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: insert.user_id,
            plan_id: insert.plan_id,
            order_id: insert.order_id,
            starts_at: insert.starts_at,
            ends_at: insert.ends_at,
            is_active: insert.is_active,
            auto_renew: insert.auto_renew,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Mocks {
        plans: MockPlanRepository,
        methods: MockPaymentMethodRepository,
        orders: MockOrderRepository,
        subscriptions: MockSubscriptionRepository,
        gateways: HashMap<String, Arc<dyn PaymentGateway>>,
        verifier: MockWebhookVerifier,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                plans: MockPlanRepository::new(),
                methods: MockPaymentMethodRepository::new(),
                orders: MockOrderRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
                gateways: HashMap::new(),
                verifier: MockWebhookVerifier::new(),
            }
        }

        fn into_usecase(
            self,
        ) -> CheckoutUseCase<
            MockPlanRepository,
            MockPaymentMethodRepository,
            MockOrderRepository,
            MockSubscriptionRepository,
        > {
            CheckoutUseCase::new(
                Arc::new(self.plans),
                Arc::new(self.methods),
                Arc::new(self.orders),
                Arc::new(self.subscriptions),
                self.gateways,
                Arc::new(self.verifier),
            )
        }
    }

    #[tokio::test]
    async fn start_checkout_reuses_pending_order() {
        let mut mocks = Mocks::new();
        let plan = plan(30);
        let plan_id = plan.id;
        let existing = {
            let mut order = order(OrderStatus::Pending);
            order.plan_id = Some(plan_id);
            order
        };
        let existing_id = existing.id;

        mocks
            .plans
            .expect_find_active_plan_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        mocks
            .orders
            .expect_find_or_create_pending()
            .times(2)
            .withf(move |insert| insert.plan_id == Some(plan_id))
            .returning(move |_| Ok(existing.clone()));
        mocks
            .methods
            .expect_list_active()
            .returning(|| Ok(vec![payment_method("stripe"), payment_method("cod")]));

        let usecase = mocks.into_usecase();
        let user_id = Uuid::new_v4();

        let first = usecase.start_checkout(user_id, plan_id).await.unwrap();
        let second = usecase.start_checkout(user_id, plan_id).await.unwrap();
        assert_eq!(first.order_id, existing_id);
        assert_eq!(second.order_id, existing_id);
    }

    #[tokio::test]
    async fn process_payment_on_paid_order_is_a_noop() {
        let mut mocks = Mocks::new();
        let paid = order(OrderStatus::Paid);
        let order_id = paid.id;
        let user_id = paid.user_id;

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(paid.clone())));

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_process_payment().times(0);
        mocks.gateways.insert("stripe".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let dto = usecase.process_payment(user_id, order_id).await.unwrap();
        assert!(dto.already_paid);
        assert_eq!(dto.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn gateway_fault_leaves_order_pending() {
        let mut mocks = Mocks::new();
        let pending = order(OrderStatus::Pending);
        let order_id = pending.id;
        let user_id = pending.user_id;
        let method = payment_method("stripe");
        let method_clone = method.clone();

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(pending.clone())));
        mocks
            .methods
            .expect_find_by_id()
            .returning(move |_| Ok(Some(method_clone.clone())));
        mocks.orders.expect_set_transaction_id().times(0);
        mocks.orders.expect_mark_processing().times(0);

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_process_payment()
            .returning(|_| Err(anyhow!("card declined")));
        mocks.gateways.insert("stripe".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let result = usecase.process_payment(user_id, order_id).await;
        assert!(matches!(result, Err(CheckoutError::Gateway(_))));
    }

    #[tokio::test]
    async fn offline_gateway_marks_order_processing() {
        let mut mocks = Mocks::new();
        let pending = order(OrderStatus::Pending);
        let order_id = pending.id;
        let user_id = pending.user_id;
        let method = payment_method("cod");
        let method_clone = method.clone();

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(pending.clone())));
        mocks
            .methods
            .expect_find_by_id()
            .returning(move |_| Ok(Some(method_clone.clone())));
        mocks
            .orders
            .expect_mark_processing()
            .times(1)
            .returning(|_| Ok(true));

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_process_payment().returning(|_| {
            Ok(PaymentInitiation {
                immediate_status: Some(OrderStatus::Processing),
                ..Default::default()
            })
        });
        mocks.gateways.insert("cod".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let dto = usecase.process_payment(user_id, order_id).await.unwrap();
        assert_eq!(dto.status, OrderStatus::Processing);
        assert!(!dto.already_paid);
    }

    #[tokio::test]
    async fn verify_on_paid_order_succeeds_without_side_effects() {
        let mut mocks = Mocks::new();
        let paid = order(OrderStatus::Paid);
        let order_id = paid.id;
        let user_id = paid.user_id;

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(paid.clone())));
        mocks.orders.expect_mark_paid().times(0);

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_verify_payment().times(0);
        mocks.gateways.insert("stripe".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let dto = usecase
            .verify_payment(user_id, order_id, PaymentConfirmationModel::default())
            .await
            .unwrap();
        assert!(dto.verified);
        assert_eq!(dto.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn verified_payment_provisions_subscription_window() {
        let mut mocks = Mocks::new();
        let plan = plan(30);
        let plan_id = plan.id;
        let mut pending = order(OrderStatus::Pending);
        pending.plan_id = Some(plan_id);
        let order_id = pending.id;
        let user_id = pending.user_id;
        let method = payment_method("stripe");
        let method_clone = method.clone();

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(pending.clone())));
        mocks
            .methods
            .expect_find_by_id()
            .returning(move |_| Ok(Some(method_clone.clone())));
        mocks
            .orders
            .expect_mark_paid()
            .times(1)
            .returning(|_, _, _| Ok(true));
        mocks
            .plans
            .expect_find_plan_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        mocks
            .subscriptions
            .expect_replace_active_subscription()
            .times(1)
            .withf(move |insert| {
                insert.is_active
                    && !insert.auto_renew
                    && insert.plan_id == Some(plan_id)
                    && insert.ends_at - insert.starts_at == Duration::days(30)
            })
            .returning(|insert| Ok(subscription_from(&insert)));

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_verify_payment().returning(|_, _| {
            Ok(Some(PaymentProof {
                transaction_id: Some("pi_123".to_string()),
                details: serde_json::json!({ "stripe_status": "succeeded" }),
            }))
        });
        mocks.gateways.insert("stripe".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let dto = usecase
            .verify_payment(user_id, order_id, PaymentConfirmationModel::default())
            .await
            .unwrap();
        assert!(dto.verified);
        assert_eq!(dto.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn unverified_payment_mutates_nothing() {
        let mut mocks = Mocks::new();
        let pending = order(OrderStatus::Pending);
        let order_id = pending.id;
        let user_id = pending.user_id;
        let method = payment_method("stripe");
        let method_clone = method.clone();

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(pending.clone())));
        mocks
            .methods
            .expect_find_by_id()
            .returning(move |_| Ok(Some(method_clone.clone())));
        mocks.orders.expect_mark_paid().times(0);

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_verify_payment().returning(|_, _| Ok(None));
        mocks.gateways.insert("stripe".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let dto = usecase
            .verify_payment(user_id, order_id, PaymentConfirmationModel::default())
            .await
            .unwrap();
        assert!(!dto.verified);
        assert_eq!(dto.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn webhook_redelivery_provisions_at_most_once() {
        let mut mocks = Mocks::new();
        let plan = plan(30);
        let plan_id = plan.id;
        let mut pending = order(OrderStatus::Pending);
        pending.plan_id = Some(plan_id);
        let order_id = pending.id;

        let payload = serde_json::json!({
            "id": "pi_123",
            "metadata": { "order_id": order_id.to_string() }
        });
        mocks.verifier.expect_verify().returning(move |_, _| {
            Ok(PaymentEvent {
                event_type: "payment_intent.succeeded".to_string(),
                object: payload.clone(),
            })
        });
        mocks
            .orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(pending.clone())));

        // First delivery wins the gated transition; the second no-ops.
        let mut deliveries = 0;
        mocks.orders.expect_mark_paid().times(2).returning(move |_, _, _| {
            deliveries += 1;
            Ok(deliveries == 1)
        });
        mocks
            .plans
            .expect_find_plan_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        mocks
            .subscriptions
            .expect_replace_active_subscription()
            .times(1)
            .returning(|insert| Ok(subscription_from(&insert)));

        let usecase = mocks.into_usecase();
        usecase
            .handle_stripe_webhook(b"{}", "t=1,v1=sig")
            .await
            .unwrap();
        usecase
            .handle_stripe_webhook(b"{}", "t=1,v1=sig")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn webhook_ignores_unrelated_event_types() {
        let mut mocks = Mocks::new();
        mocks.verifier.expect_verify().returning(|_, _| {
            Ok(PaymentEvent {
                event_type: "payment_intent.created".to_string(),
                object: serde_json::json!({}),
            })
        });
        mocks.orders.expect_find_by_id().times(0);

        let usecase = mocks.into_usecase();
        usecase
            .handle_stripe_webhook(b"{}", "t=1,v1=sig")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn payment_is_rejected_for_cancelled_orders() {
        let mut mocks = Mocks::new();
        let cancelled = order(OrderStatus::Cancelled);
        let order_id = cancelled.id;
        let user_id = cancelled.user_id;

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(cancelled.clone())));
        mocks.orders.expect_set_transaction_id().times(0);
        mocks.orders.expect_mark_processing().times(0);

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_process_payment().times(0);
        mocks.gateways.insert("stripe".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let result = usecase.process_payment(user_id, order_id).await;
        assert!(matches!(result, Err(CheckoutError::InvalidTransition)));
    }

    #[tokio::test]
    async fn verify_is_rejected_for_cancelled_orders() {
        let mut mocks = Mocks::new();
        let cancelled = order(OrderStatus::Cancelled);
        let order_id = cancelled.id;
        let user_id = cancelled.user_id;

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(cancelled.clone())));
        mocks.orders.expect_mark_paid().times(0);
        mocks
            .subscriptions
            .expect_replace_active_subscription()
            .times(0);

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_verify_payment().times(0);
        mocks.gateways.insert("stripe".to_string(), Arc::new(gateway));

        let usecase = mocks.into_usecase();
        let result = usecase
            .verify_payment(user_id, order_id, PaymentConfirmationModel::default())
            .await;
        assert!(matches!(result, Err(CheckoutError::InvalidTransition)));
    }

    #[tokio::test]
    async fn webhook_leaves_cancelled_orders_closed() {
        let mut mocks = Mocks::new();
        let cancelled = order(OrderStatus::Cancelled);
        let order_id = cancelled.id;

        let payload = serde_json::json!({
            "id": "pi_123",
            "metadata": { "order_id": order_id.to_string() }
        });
        mocks.verifier.expect_verify().returning(move |_, _| {
            Ok(PaymentEvent {
                event_type: "payment_intent.succeeded".to_string(),
                object: payload.clone(),
            })
        });
        mocks
            .orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(cancelled.clone())));
        mocks.orders.expect_mark_paid().times(0);
        mocks
            .subscriptions
            .expect_replace_active_subscription()
            .times(0);

        // Acknowledged without reopening the order.
        let usecase = mocks.into_usecase();
        usecase
            .handle_stripe_webhook(b"{}", "t=1,v1=sig")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn start_checkout_surfaces_unknown_order_status() {
        let mut mocks = Mocks::new();
        let plan = plan(30);
        let plan_id = plan.id;
        let mut corrupted = order(OrderStatus::Pending);
        corrupted.status = "garbage".to_string();
        corrupted.plan_id = Some(plan_id);

        mocks
            .plans
            .expect_find_active_plan_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        mocks
            .orders
            .expect_find_or_create_pending()
            .returning(move |_| Ok(corrupted.clone()));
        mocks
            .methods
            .expect_list_active()
            .returning(|| Ok(vec![payment_method("stripe")]));

        let usecase = mocks.into_usecase();
        let result = usecase.start_checkout(Uuid::new_v4(), plan_id).await;
        assert!(matches!(result, Err(CheckoutError::Internal(_))));
    }

    #[tokio::test]
    async fn cancel_is_rejected_for_paid_orders() {
        let mut mocks = Mocks::new();
        let paid = order(OrderStatus::Paid);
        let order_id = paid.id;
        let user_id = paid.user_id;

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(paid.clone())));
        mocks.orders.expect_cancel().times(0);

        let usecase = mocks.into_usecase();
        let result = usecase.cancel_order(user_id, order_id).await;
        assert!(matches!(result, Err(CheckoutError::InvalidTransition)));
    }

    #[tokio::test]
    async fn cancel_transitions_pending_orders() {
        let mut mocks = Mocks::new();
        let pending = order(OrderStatus::Pending);
        let order_id = pending.id;
        let user_id = pending.user_id;

        mocks
            .orders
            .expect_find_by_id_for_user()
            .returning(move |_, _| Ok(Some(pending.clone())));
        mocks
            .orders
            .expect_cancel()
            .times(1)
            .returning(|_| Ok(true));

        let usecase = mocks.into_usecase();
        usecase.cancel_order(user_id, order_id).await.unwrap();
    }
}
