pub mod admin_sync;
pub mod catalog;
pub mod checkout;
pub mod interactions;
pub mod payment_webhook;
