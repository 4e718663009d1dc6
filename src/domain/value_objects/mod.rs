pub mod catalog;
pub mod catalog_sync;
pub mod checkout;
pub mod enums;
pub mod interactions;
