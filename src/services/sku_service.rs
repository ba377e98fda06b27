// src/services/sku_service.rs

use std::sync::Arc;

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::SkuStore,
    models::sku::{NewSku, Sku},
};

#[derive(Clone)]
pub struct SkuService {
    skus: Arc<dyn SkuStore>,
}

impl SkuService {
    pub fn new(skus: Arc<dyn SkuStore>) -> Self {
        Self { skus }
    }

    pub async fn create_sku(
        &self,
        tenant_id: &str,
        seller_id: &str,
        sku_code: &str,
        name: &str,
        metadata: Value,
    ) -> Result<Sku, AppError> {
        let sku = self
            .skus
            .create(&NewSku {
                tenant_id: tenant_id.to_string(),
                seller_id: seller_id.to_string(),
                sku_code: sku_code.to_string(),
                name: name.to_string(),
                metadata,
            })
            .await?;

        tracing::info!(sku_id = sku.id, sku_code = %sku.sku_code, seller_id = %sku.seller_id, "SKU criado");
        Ok(sku)
    }

    /// Busca os SKUs de um (tenant, seller) pelos códigos. Códigos que não
    /// existem apenas não aparecem no resultado.
    pub async fn get_skus_by_codes(
        &self,
        tenant_id: &str,
        seller_id: &str,
        codes: &[String],
    ) -> Result<Vec<Sku>, AppError> {
        let skus = self.skus.find_by_codes(tenant_id, seller_id, codes).await?;
        tracing::debug!(requested = codes.len(), found = skus.len(), "SKUs consultados");
        Ok(skus)
    }
}
