// src/db/sku_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{
        pool::DbPools,
        store::{SkuResolver, SkuStore},
    },
    models::sku::{NewSku, Sku, SkuRef},
};

#[derive(Clone)]
pub struct SkuRepository {
    pools: DbPools,
}

impl SkuRepository {
    pub fn new(pools: DbPools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl SkuStore for SkuRepository {
    async fn create(&self, sku: &NewSku) -> Result<Sku, AppError> {
        let created = sqlx::query_as::<_, Sku>(
            r#"
            INSERT INTO skus (tenant_id, seller_id, sku_code, name, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, seller_id, sku_code, name, metadata, created_at
            "#,
        )
        .bind(&sku.tenant_id)
        .bind(&sku.seller_id)
        .bind(&sku.sku_code)
        .bind(&sku.name)
        .bind(&sku.metadata)
        .fetch_one(self.pools.primary())
        .await?;

        Ok(created)
    }

    async fn find_by_codes(
        &self,
        tenant_id: &str,
        seller_id: &str,
        codes: &[String],
    ) -> Result<Vec<Sku>, AppError> {
        let skus = sqlx::query_as::<_, Sku>(
            r#"
            SELECT id, tenant_id, seller_id, sku_code, name, metadata, created_at
            FROM skus
            WHERE tenant_id = $1 AND seller_id = $2 AND sku_code = ANY($3)
            ORDER BY id ASC
            "#,
        )
        .bind(tenant_id)
        .bind(seller_id)
        .bind(codes)
        .fetch_all(self.pools.reader())
        .await?;

        Ok(skus)
    }
}

#[async_trait]
impl SkuResolver for SkuRepository {
    async fn resolve_codes(
        &self,
        tenant_id: Option<&str>,
        seller_id: &str,
        codes: &[String],
    ) -> Result<Vec<SkuRef>, AppError> {
        let refs = sqlx::query_as::<_, SkuRef>(
            r#"
            SELECT id AS sku_id, sku_code
            FROM skus
            WHERE ($1::text IS NULL OR tenant_id = $1)
              AND seller_id = $2
              AND sku_code = ANY($3)
            ORDER BY id ASC
            "#,
        )
        .bind(tenant_id)
        .bind(seller_id)
        .bind(codes)
        .fetch_all(self.pools.primary())
        .await?;

        Ok(refs)
    }
}
