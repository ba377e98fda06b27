pub mod hub_service;
pub use hub_service::HubService;
pub mod sku_service;
pub use sku_service::SkuService;
pub mod inventory_service;
pub use inventory_service::InventoryService;
