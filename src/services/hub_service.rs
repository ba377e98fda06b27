// src/services/hub_service.rs

use std::sync::Arc;

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::HubStore,
    models::hub::{Hub, NewHub},
};

#[derive(Clone)]
pub struct HubService {
    hubs: Arc<dyn HubStore>,
}

impl HubService {
    pub fn new(hubs: Arc<dyn HubStore>) -> Self {
        Self { hubs }
    }

    pub async fn create_hub(
        &self,
        tenant_id: &str,
        name: &str,
        location: Value,
    ) -> Result<Hub, AppError> {
        let hub = self
            .hubs
            .create(&NewHub {
                tenant_id: tenant_id.to_string(),
                name: name.to_string(),
                location,
            })
            .await?;

        tracing::info!(hub_id = hub.id, tenant_id = %hub.tenant_id, "Hub criado");
        Ok(hub)
    }

    pub async fn get_hub(&self, hub_id: i64) -> Result<Hub, AppError> {
        self.hubs
            .find_by_id(hub_id)
            .await?
            .ok_or(AppError::HubNotFound(hub_id))
    }

    pub async fn list_hubs(&self) -> Result<Vec<Hub>, AppError> {
        let hubs = self.hubs.list().await?;
        tracing::debug!(count = hubs.len(), "Hubs listados");
        Ok(hubs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn create_get_and_list() {
        let service = HubService::new(Arc::new(MemoryStore::new()));

        let hub = service
            .create_hub("t1", "Galpão Norte", json!({ "city": "Manaus" }))
            .await
            .unwrap();
        assert_eq!(service.get_hub(hub.id).await.unwrap(), hub);

        service.create_hub("t1", "Galpão Sul", json!({})).await.unwrap();
        assert_eq!(service.list_hubs().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_returns_the_requested_hub_or_not_found() {
        let service = HubService::new(Arc::new(MemoryStore::new()));
        let first = service.create_hub("t1", "A", json!({})).await.unwrap();
        let second = service.create_hub("t1", "B", json!({})).await.unwrap();

        assert_eq!(service.get_hub(second.id).await.unwrap().name, "B");
        assert_eq!(service.get_hub(first.id).await.unwrap().name, "A");
        assert!(matches!(
            service.get_hub(999).await,
            Err(AppError::HubNotFound(999))
        ));
    }
}
