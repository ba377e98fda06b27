// src/db/hub_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{
        pool::DbPools,
        store::{HubStore, HubValidator},
    },
    models::hub::{Hub, NewHub},
};

#[derive(Clone)]
pub struct HubRepository {
    pools: DbPools,
}

impl HubRepository {
    pub fn new(pools: DbPools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl HubStore for HubRepository {
    async fn create(&self, hub: &NewHub) -> Result<Hub, AppError> {
        let created = sqlx::query_as::<_, Hub>(
            r#"
            INSERT INTO hubs (tenant_id, name, location)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, name, location, created_at
            "#,
        )
        .bind(&hub.tenant_id)
        .bind(&hub.name)
        .bind(&hub.location)
        .fetch_one(self.pools.primary())
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, hub_id: i64) -> Result<Option<Hub>, AppError> {
        let hub = sqlx::query_as::<_, Hub>(
            "SELECT id, tenant_id, name, location, created_at FROM hubs WHERE id = $1",
        )
        .bind(hub_id)
        .fetch_optional(self.pools.reader())
        .await?;

        Ok(hub)
    }

    async fn list(&self) -> Result<Vec<Hub>, AppError> {
        let hubs = sqlx::query_as::<_, Hub>(
            "SELECT id, tenant_id, name, location, created_at FROM hubs ORDER BY id ASC",
        )
        .fetch_all(self.pools.reader())
        .await?;

        Ok(hubs)
    }
}

#[async_trait]
impl HubValidator for HubRepository {
    // No primário: um hub recém-criado precisa ser visível antes do upsert.
    async fn hub_exists(&self, hub_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM hubs WHERE id = $1)")
            .bind(hub_id)
            .fetch_one(self.pools.primary())
            .await?;

        Ok(exists)
    }
}
