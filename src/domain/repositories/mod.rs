pub mod categories;
pub mod interactions;
pub mod orders;
pub mod payment_methods;
pub mod plans;
pub mod subscriptions;
pub mod videos;
