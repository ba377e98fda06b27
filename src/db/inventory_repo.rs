// src/db/inventory_repo.rs

use async_trait::async_trait;

use crate::{
    common::{db_utils, error::AppError},
    db::{pool::DbPools, store::InventoryStore},
    models::inventory::{Inventory, InventoryKey, InventoryView, NewInventory},
};

#[derive(Clone)]
pub struct InventoryRepository {
    pools: DbPools,
}

impl InventoryRepository {
    pub fn new(pools: DbPools) -> Self {
        Self { pools }
    }

    // Linha existe para (hub, seller, sku)? Apenas leitura, no primário.
    async fn exists(&self, key: &InventoryKey) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM inventory
                WHERE hub_id = $1 AND seller_id = $2 AND sku_id = $3
            )
            "#,
        )
        .bind(key.hub_id)
        .bind(&key.seller_id)
        .bind(key.sku_id)
        .fetch_one(self.pools.primary())
        .await?;

        Ok(exists)
    }
}

// Converte as violações de constraint da tabela 'inventory' em erros de domínio.
fn map_write_error(e: sqlx::Error, row: &NewInventory) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::InventoryAlreadyExists {
                sku_id: row.sku_id,
                hub_id: row.hub_id,
            };
        }
        if db_err.is_check_violation() {
            return AppError::InvalidQuantity(row.quantity);
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("hub") {
                return AppError::HubNotFound(row.hub_id);
            }
            return AppError::SkuNotFound(format!("id {}", row.sku_id));
        }
    }
    e.into()
}

#[async_trait]
impl InventoryStore for InventoryRepository {
    async fn insert(&self, row: &NewInventory) -> Result<Inventory, AppError> {
        sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventory (tenant_id, seller_id, sku_id, hub_id, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, seller_id, sku_id, hub_id, quantity, updated_at
            "#,
        )
        .bind(&row.tenant_id)
        .bind(&row.seller_id)
        .bind(row.sku_id)
        .bind(row.hub_id)
        .bind(row.quantity)
        .fetch_one(self.pools.primary())
        .await
        .map_err(|e| map_write_error(e, row))
    }

    async fn upsert_on_conflict(&self, row: &NewInventory) -> Result<Inventory, AppError> {
        // Tenta INSERIR. Se já existir (ON CONFLICT), ele SUBSTITUI a quantidade.
        // Uma única instrução: dois upserts concorrentes não se atropelam.
        sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventory (tenant_id, seller_id, sku_id, hub_id, quantity)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (sku_id, hub_id)
            DO UPDATE SET
                quantity = EXCLUDED.quantity,
                tenant_id = EXCLUDED.tenant_id,
                seller_id = EXCLUDED.seller_id,
                updated_at = NOW()
            RETURNING id, tenant_id, seller_id, sku_id, hub_id, quantity, updated_at
            "#,
        )
        .bind(&row.tenant_id)
        .bind(&row.seller_id)
        .bind(row.sku_id)
        .bind(row.hub_id)
        .bind(row.quantity)
        .fetch_one(self.pools.primary())
        .await
        .map_err(|e| map_write_error(e, row))
    }

    async fn atomic_adjust(&self, key: &InventoryKey, delta: i64) -> Result<Inventory, AppError> {
        // Leitura + soma + escrita no próprio banco: sem "lost update".
        // A guarda `quantity + delta >= 0` faz a linha simplesmente não casar
        // quando o saldo ficaria negativo.
        let updated = sqlx::query_as::<_, Inventory>(
            r#"
            UPDATE inventory
            SET quantity = quantity + $4,
                updated_at = NOW()
            WHERE hub_id = $1 AND seller_id = $2 AND sku_id = $3
              AND quantity + $4 >= 0
            RETURNING id, tenant_id, seller_id, sku_id, hub_id, quantity, updated_at
            "#,
        )
        .bind(key.hub_id)
        .bind(&key.seller_id)
        .bind(key.sku_id)
        .bind(delta)
        .fetch_optional(self.pools.primary())
        .await
        .map_err(|e| {
            if db_utils::sqlstate(&e).as_deref() == Some(db_utils::NUMERIC_OUT_OF_RANGE) {
                return AppError::QuantityOverflow { delta };
            }
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_check_violation() {
                    return AppError::InsufficientStock { delta };
                }
            }
            e.into()
        })?;

        match updated {
            Some(level) => Ok(level),
            // Nenhuma linha atualizada: ou não existe, ou o saldo ficaria negativo.
            None if self.exists(key).await? => Err(AppError::InsufficientStock { delta }),
            None => Err(AppError::InventoryNotFound {
                hub_id: key.hub_id,
                seller_id: key.seller_id.clone(),
                sku_id: key.sku_id,
            }),
        }
    }

    async fn query_by_hub_seller(
        &self,
        hub_id: i64,
        seller_id: &str,
        sku_codes: &[String],
    ) -> Result<Vec<InventoryView>, AppError> {
        let levels = sqlx::query_as::<_, InventoryView>(
            r#"
            SELECT i.id, i.sku_id, s.sku_code, i.hub_id, i.seller_id, i.quantity, i.updated_at
            FROM inventory AS i
            JOIN skus AS s ON s.id = i.sku_id
            WHERE i.hub_id = $1 AND i.seller_id = $2
              AND (cardinality($3::text[]) = 0 OR s.sku_code = ANY($3))
            ORDER BY s.sku_code ASC, i.id ASC
            "#,
        )
        .bind(hub_id)
        .bind(seller_id)
        .bind(sku_codes)
        .fetch_all(self.pools.reader())
        .await?;

        Ok(levels)
    }
}
