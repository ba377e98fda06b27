// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- 1. Saldo ---
// Representa a tabela 'inventory': quantidade de um SKU em um hub.
// Existe no máximo uma linha por (sku_id, hub_id) e quantity nunca é negativa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Inventory {
    pub id: i64,
    pub tenant_id: String,
    pub seller_id: String,
    pub sku_id: i64,
    pub hub_id: i64,
    #[schema(example = 50)]
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Saldo com o código do SKU (leitura por hub + seller) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryView {
    pub id: i64,
    pub sku_id: i64,
    #[schema(example = "X1")]
    pub sku_code: String,
    pub hub_id: i64,
    pub seller_id: String,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

// --- 3. Entradas da camada de armazenamento ---

/// Linha a ser gravada (create ou upsert), com o SKU já resolvido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventory {
    pub tenant_id: String,
    pub seller_id: String,
    pub sku_id: i64,
    pub hub_id: i64,
    pub quantity: i64,
}

/// Chave de um ajuste: (hub, seller, sku_id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InventoryKey {
    pub hub_id: i64,
    pub seller_id: String,
    pub sku_id: i64,
}

// --- 4. Comandos do Ledger ---

/// Como o chamador identifica o SKU num ajuste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkuKey {
    Id(i64),
    Code(String),
}

/// Create / Upsert: define a quantidade absoluta de um SKU num hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAssignment {
    pub tenant_id: String,
    pub seller_id: String,
    pub sku_code: String,
    pub hub_id: i64,
    pub quantity: i64,
}

/// AdjustQuantity: soma um delta (negativo = baixa) ao saldo existente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    // Opcional: a rota de ajuste não exige tenant. Sem ele o SKU é procurado
    // em qualquer tenant daquele seller.
    pub tenant_id: Option<String>,
    pub seller_id: String,
    pub hub_id: i64,
    pub sku: SkuKey,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryQuery {
    pub tenant_id: String,
    pub seller_id: String,
    pub hub_id: i64,
    pub sku_codes: Vec<String>,
}
