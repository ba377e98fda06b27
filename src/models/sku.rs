// src/models/sku.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;

// ---
// SKU (o "Catálogo")
// ---
// O código é único por (tenant, seller) apenas por convenção: não existe
// constraint no banco para isso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sku {
    pub id: i64,
    #[schema(example = "tenant-1")]
    pub tenant_id: String,
    #[schema(example = "seller-1")]
    pub seller_id: String,
    #[schema(example = "X1")]
    pub sku_code: String,
    pub name: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSku {
    pub tenant_id: String,
    pub seller_id: String,
    pub sku_code: String,
    pub name: String,
    pub metadata: Value,
}

/// Resultado da resolução código -> id interno.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SkuRef {
    pub sku_id: i64,
    pub sku_code: String,
}
