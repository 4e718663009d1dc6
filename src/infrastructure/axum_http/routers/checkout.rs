use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    application::usecases::checkout::CheckoutUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            orders::OrderRepository, payment_methods::PaymentMethodRepository,
            plans::PlanRepository, subscriptions::SubscriptionRepository,
        },
        value_objects::checkout::{CheckoutDetailsModel, PaymentConfirmationModel},
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        payments::{
            gateways::payment_gateways, paypal_client::PaypalClient, stripe_client::StripeClient,
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                orders::OrderPostgres, payment_methods::PaymentMethodPostgres,
                plans::PlanPostgres, subscriptions::SubscriptionPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let payment_method_repository = PaymentMethodPostgres::new(Arc::clone(&db_pool));
    let order_repository = OrderPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));

    let stripe_client = Arc::new(StripeClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
    ));
    let paypal_client = Arc::new(PaypalClient::new(
        config.paypal.mode.clone(),
        config.paypal.client_id.clone(),
        config.paypal.client_secret.clone(),
        config.paypal.return_url.clone(),
        config.paypal.cancel_url.clone(),
    ));

    let checkout_usecase = CheckoutUseCase::new(
        Arc::new(plan_repository),
        Arc::new(payment_method_repository),
        Arc::new(order_repository),
        Arc::new(subscription_repository),
        payment_gateways(Arc::clone(&stripe_client), paypal_client),
        stripe_client,
    );

    Router::new()
        .route("/plans", get(list_plans))
        .route("/plans/:plan_id/checkout", post(start_checkout))
        .route("/subscription", get(current_subscription))
        .route("/orders/:order_id/details", post(submit_checkout))
        .route("/orders/:order_id/pay", post(process_payment))
        .route("/orders/:order_id/verify", post(verify_payment))
        .route("/orders/:order_id/cancel", post(cancel_order))
        .with_state(Arc::new(checkout_usecase))
}

pub async fn list_plans<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match checkout_usecase.list_plans().await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn current_subscription<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match checkout_usecase.current_subscription(auth.user_id).await {
        Ok(subscription) => Json(subscription).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn start_checkout<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match checkout_usecase.start_checkout(auth.user_id, plan_id).await {
        Ok(session) => Json(session).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn submit_checkout<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
    Json(details): Json<CheckoutDetailsModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match checkout_usecase
        .submit_checkout(auth.user_id, order_id, details)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn process_payment<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match checkout_usecase.process_payment(auth.user_id, order_id).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn verify_payment<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
    Json(confirmation): Json<PaymentConfirmationModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match checkout_usecase
        .verify_payment(auth.user_id, order_id, confirmation)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn cancel_order<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match checkout_usecase.cancel_order(auth.user_id, order_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}
