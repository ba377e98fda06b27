pub mod hub;
pub mod inventory;
pub mod sku;
