pub mod axum_http;
pub mod payments;
pub mod postgres;
pub mod youtube;
