// src/db/store.rs

// Contratos de armazenamento. O Ledger depende só destes traits, então roda
// igual contra o Postgres e contra o MemoryStore dos testes.

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        hub::{Hub, NewHub},
        inventory::{Inventory, InventoryKey, InventoryView, NewInventory},
        sku::{NewSku, Sku, SkuRef},
    },
};

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// INSERT simples. Se já existir linha para (sku_id, hub_id), falha com
    /// `InventoryAlreadyExists` (violação de unicidade, sem checagem prévia).
    async fn insert(&self, row: &NewInventory) -> Result<Inventory, AppError>;

    /// Insere ou substitui quantity/tenant/seller numa única escrita atômica,
    /// usando (sku_id, hub_id) como alvo do conflito.
    async fn upsert_on_conflict(&self, row: &NewInventory) -> Result<Inventory, AppError>;

    /// `quantity = quantity + delta` numa única escrita, protegida pela
    /// existência da linha e por `quantity + delta >= 0`. Nada é gravado
    /// quando a operação falha.
    async fn atomic_adjust(&self, key: &InventoryKey, delta: i64) -> Result<Inventory, AppError>;

    /// Saldos de um (hub, seller). `sku_codes` vazio = sem filtro.
    async fn query_by_hub_seller(
        &self,
        hub_id: i64,
        seller_id: &str,
        sku_codes: &[String],
    ) -> Result<Vec<InventoryView>, AppError>;
}

#[async_trait]
pub trait SkuResolver: Send + Sync {
    /// Traduz códigos em ids internos. Códigos sem correspondência são
    /// omitidos em silêncio: quem chama decide se isso é erro.
    /// `tenant_id = None` aceita qualquer tenant do seller.
    async fn resolve_codes(
        &self,
        tenant_id: Option<&str>,
        seller_id: &str,
        codes: &[String],
    ) -> Result<Vec<SkuRef>, AppError>;
}

#[async_trait]
pub trait HubValidator: Send + Sync {
    async fn hub_exists(&self, hub_id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait HubStore: Send + Sync {
    async fn create(&self, hub: &NewHub) -> Result<Hub, AppError>;
    async fn find_by_id(&self, hub_id: i64) -> Result<Option<Hub>, AppError>;
    async fn list(&self) -> Result<Vec<Hub>, AppError>;
}

#[async_trait]
pub trait SkuStore: Send + Sync {
    async fn create(&self, sku: &NewSku) -> Result<Sku, AppError>;
    async fn find_by_codes(
        &self,
        tenant_id: &str,
        seller_id: &str,
        codes: &[String],
    ) -> Result<Vec<Sku>, AppError>;
}
