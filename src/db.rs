pub mod store;
pub use store::{HubStore, HubValidator, InventoryStore, SkuResolver, SkuStore};
pub mod pool;
pub mod hub_repo;
pub use hub_repo::HubRepository;
pub mod sku_repo;
pub use sku_repo::SkuRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod memory;
pub use memory::MemoryStore;

use std::sync::Arc;

use pool::DbPools;

// As implementações concretas, já vistas pelos seus contratos.
#[derive(Clone)]
pub struct Stores {
    pub hubs: Arc<dyn HubStore>,
    pub hub_validator: Arc<dyn HubValidator>,
    pub skus: Arc<dyn SkuStore>,
    pub sku_resolver: Arc<dyn SkuResolver>,
    pub inventory: Arc<dyn InventoryStore>,
}

impl Stores {
    pub fn postgres(pools: DbPools) -> Self {
        let hubs = Arc::new(HubRepository::new(pools.clone()));
        let skus = Arc::new(SkuRepository::new(pools.clone()));
        let inventory = Arc::new(InventoryRepository::new(pools));

        Self {
            hubs: hubs.clone(),
            hub_validator: hubs,
            skus: skus.clone(),
            sku_resolver: skus,
            inventory,
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            hubs: store.clone(),
            hub_validator: store.clone(),
            skus: store.clone(),
            sku_resolver: store.clone(),
            inventory: store,
        }
    }
}
