// src/db/memory.rs

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    common::error::AppError,
    db::store::{HubStore, HubValidator, InventoryStore, SkuResolver, SkuStore},
    models::{
        hub::{Hub, NewHub},
        inventory::{Inventory, InventoryKey, InventoryView, NewInventory},
        sku::{NewSku, Sku, SkuRef},
    },
};

#[derive(Debug, Default)]
struct MemoryState {
    hubs: BTreeMap<i64, Hub>,
    skus: BTreeMap<i64, Sku>,
    inventory: BTreeMap<i64, Inventory>,
    // Índice da constraint UNIQUE (sku_id, hub_id) -> inventory.id
    inventory_by_pair: HashMap<(i64, i64), i64>,
    last_hub_id: i64,
    last_sku_id: i64,
    last_inventory_id: i64,
}

impl MemoryState {
    // Emula as FKs e o CHECK (quantity >= 0) da tabela 'inventory'.
    fn check_row(&self, row: &NewInventory) -> Result<(), AppError> {
        if !self.hubs.contains_key(&row.hub_id) {
            return Err(AppError::HubNotFound(row.hub_id));
        }
        if !self.skus.contains_key(&row.sku_id) {
            return Err(AppError::SkuNotFound(format!("id {}", row.sku_id)));
        }
        if row.quantity < 0 {
            return Err(AppError::InvalidQuantity(row.quantity));
        }
        Ok(())
    }

    fn insert_row(&mut self, row: &NewInventory) -> Inventory {
        self.last_inventory_id += 1;
        let level = Inventory {
            id: self.last_inventory_id,
            tenant_id: row.tenant_id.clone(),
            seller_id: row.seller_id.clone(),
            sku_id: row.sku_id,
            hub_id: row.hub_id,
            quantity: row.quantity,
            updated_at: Utc::now(),
        };
        self.inventory_by_pair.insert((row.sku_id, row.hub_id), level.id);
        self.inventory.insert(level.id, level.clone());
        level
    }
}

/// Implementação em memória de todos os contratos de armazenamento.
///
/// Cada operação roda inteira sob um único lock, então as escritas são
/// atômicas como as instruções do Postgres. Usada nos testes e com
/// `STORAGE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("lock do MemoryStore envenenado")))
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn insert(&self, row: &NewInventory) -> Result<Inventory, AppError> {
        let mut state = self.state()?;
        state.check_row(row)?;

        if state.inventory_by_pair.contains_key(&(row.sku_id, row.hub_id)) {
            return Err(AppError::InventoryAlreadyExists {
                sku_id: row.sku_id,
                hub_id: row.hub_id,
            });
        }

        Ok(state.insert_row(row))
    }

    async fn upsert_on_conflict(&self, row: &NewInventory) -> Result<Inventory, AppError> {
        let mut state = self.state()?;
        state.check_row(row)?;

        let existing = state.inventory_by_pair.get(&(row.sku_id, row.hub_id)).copied();
        if let Some(level) = existing.and_then(|id| state.inventory.get_mut(&id)) {
            level.quantity = row.quantity;
            level.tenant_id = row.tenant_id.clone();
            level.seller_id = row.seller_id.clone();
            level.updated_at = Utc::now();
            return Ok(level.clone());
        }

        Ok(state.insert_row(row))
    }

    async fn atomic_adjust(&self, key: &InventoryKey, delta: i64) -> Result<Inventory, AppError> {
        let mut state = self.state()?;

        let not_found = || AppError::InventoryNotFound {
            hub_id: key.hub_id,
            seller_id: key.seller_id.clone(),
            sku_id: key.sku_id,
        };

        let id = state
            .inventory_by_pair
            .get(&(key.sku_id, key.hub_id))
            .copied()
            .ok_or_else(not_found)?;
        let level = state
            .inventory
            .get_mut(&id)
            .filter(|level| level.seller_id == key.seller_id)
            .ok_or_else(not_found)?;

        let quantity = level
            .quantity
            .checked_add(delta)
            .ok_or(AppError::QuantityOverflow { delta })?;
        if quantity < 0 {
            return Err(AppError::InsufficientStock { delta });
        }

        level.quantity = quantity;
        level.updated_at = Utc::now();
        Ok(level.clone())
    }

    async fn query_by_hub_seller(
        &self,
        hub_id: i64,
        seller_id: &str,
        sku_codes: &[String],
    ) -> Result<Vec<InventoryView>, AppError> {
        let state = self.state()?;

        let mut levels: Vec<InventoryView> = state
            .inventory
            .values()
            .filter(|level| level.hub_id == hub_id && level.seller_id == seller_id)
            .filter_map(|level| {
                let sku = state.skus.get(&level.sku_id)?;
                if !sku_codes.is_empty() && !sku_codes.contains(&sku.sku_code) {
                    return None;
                }
                Some(InventoryView {
                    id: level.id,
                    sku_id: level.sku_id,
                    sku_code: sku.sku_code.clone(),
                    hub_id: level.hub_id,
                    seller_id: level.seller_id.clone(),
                    quantity: level.quantity,
                    updated_at: level.updated_at,
                })
            })
            .collect();

        levels.sort_by(|a, b| a.sku_code.cmp(&b.sku_code).then(a.id.cmp(&b.id)));
        Ok(levels)
    }
}

#[async_trait]
impl SkuResolver for MemoryStore {
    async fn resolve_codes(
        &self,
        tenant_id: Option<&str>,
        seller_id: &str,
        codes: &[String],
    ) -> Result<Vec<SkuRef>, AppError> {
        let state = self.state()?;

        Ok(state
            .skus
            .values()
            .filter(|sku| tenant_id.is_none_or(|tenant| sku.tenant_id == tenant))
            .filter(|sku| sku.seller_id == seller_id && codes.contains(&sku.sku_code))
            .map(|sku| SkuRef {
                sku_id: sku.id,
                sku_code: sku.sku_code.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl HubValidator for MemoryStore {
    async fn hub_exists(&self, hub_id: i64) -> Result<bool, AppError> {
        Ok(self.state()?.hubs.contains_key(&hub_id))
    }
}

#[async_trait]
impl HubStore for MemoryStore {
    async fn create(&self, hub: &NewHub) -> Result<Hub, AppError> {
        let mut state = self.state()?;
        state.last_hub_id += 1;

        let created = Hub {
            id: state.last_hub_id,
            tenant_id: hub.tenant_id.clone(),
            name: hub.name.clone(),
            location: hub.location.clone(),
            created_at: Utc::now(),
        };
        state.hubs.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, hub_id: i64) -> Result<Option<Hub>, AppError> {
        Ok(self.state()?.hubs.get(&hub_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Hub>, AppError> {
        Ok(self.state()?.hubs.values().cloned().collect())
    }
}

#[async_trait]
impl SkuStore for MemoryStore {
    async fn create(&self, sku: &NewSku) -> Result<Sku, AppError> {
        let mut state = self.state()?;
        state.last_sku_id += 1;

        let created = Sku {
            id: state.last_sku_id,
            tenant_id: sku.tenant_id.clone(),
            seller_id: sku.seller_id.clone(),
            sku_code: sku.sku_code.clone(),
            name: sku.name.clone(),
            metadata: sku.metadata.clone(),
            created_at: Utc::now(),
        };
        state.skus.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_codes(
        &self,
        tenant_id: &str,
        seller_id: &str,
        codes: &[String],
    ) -> Result<Vec<Sku>, AppError> {
        let state = self.state()?;

        Ok(state
            .skus
            .values()
            .filter(|sku| sku.tenant_id == tenant_id && sku.seller_id == seller_id)
            .filter(|sku| codes.contains(&sku.sku_code))
            .cloned()
            .collect())
    }
}
