// src/models/hub.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;

// ---
// Hub (o "Armazém")
// ---
// Local físico onde o estoque fica guardado. Imutável depois de criado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Hub {
    pub id: i64,
    #[schema(example = "tenant-1")]
    pub tenant_id: String,
    #[schema(example = "Galpão Norte")]
    pub name: String,
    // Documento livre (endereço, coordenadas...), guardado como JSONB
    #[schema(value_type = Object)]
    pub location: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewHub {
    pub tenant_id: String,
    pub name: String,
    pub location: Value,
}
