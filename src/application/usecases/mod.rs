pub mod catalog;
pub mod catalog_sync;
pub mod checkout;
pub mod interactions;
