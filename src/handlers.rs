pub mod health;
pub mod hubs;
pub mod inventory;
pub mod skus;
