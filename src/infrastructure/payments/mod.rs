pub mod gateways;
pub mod paypal_client;
pub mod stripe_client;
