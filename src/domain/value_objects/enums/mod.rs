pub mod category_kinds;
pub mod order_statuses;
