use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};

use crate::{
    application::usecases::checkout::CheckoutUseCase,
    config::config_model::DotEnvyConfig,
    domain::repositories::{
        orders::OrderRepository, payment_methods::PaymentMethodRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    infrastructure::{
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
        .route("/stripe", post(handle_stripe_webhook))
        .with_state(Arc::new(checkout_usecase))
}

pub async fn handle_stripe_webhook<P, M, O, S>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, M, O, S>>>,
    headers: HeaderMap,
    payload: Bytes,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync,
    M: PaymentMethodRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    else {
        return (StatusCode::BAD_REQUEST, "Missing Stripe-Signature header").into_response();
    };

    match checkout_usecase
        .handle_stripe_webhook(&payload, signature)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}
