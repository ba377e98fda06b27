// src/services/inventory_service.rs

use std::{collections::HashSet, future::Future, sync::Arc, time::Duration};

use crate::{
    common::error::AppError,
    db::{HubValidator, InventoryStore, SkuResolver},
    models::inventory::{
        Inventory, InventoryKey, InventoryQuery, InventoryView, NewInventory, SkuKey,
        StockAdjustment, StockAssignment,
    },
};

pub const MAX_SKU_CODES_PER_QUERY: usize = 100;

// O "Ledger": única porta de escrita da tabela 'inventory'.
//
// Regras: quantity >= 0 sempre, uma linha por (sku_id, hub_id), e ajustes
// feitos pelo banco numa única escrita. Não há retry interno: todo erro volta
// tipado para quem chamou.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    skus: Arc<dyn SkuResolver>,
    hubs: Arc<dyn HubValidator>,
}

impl InventoryService {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        skus: Arc<dyn SkuResolver>,
        hubs: Arc<dyn HubValidator>,
    ) -> Self {
        Self { store, skus, hubs }
    }

    // Esgotado o prazo, o future da chamada ao banco é descartado (abortado).
    async fn with_deadline<T, F>(deadline: Duration, operation: &'static str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, deadline_ms = deadline.as_millis() as u64, "Prazo esgotado, operação cancelada");
                Err(AppError::Cancelled)
            }
        }
    }

    fn log_outcome<T>(operation: &'static str, result: &Result<T, AppError>) {
        match result {
            Ok(_) => tracing::info!(operation, "Operação de estoque concluída"),
            Err(e) if e.status().is_server_error() => {
                tracing::error!(operation, code = e.code(), "Falha na operação de estoque: {}", e)
            }
            Err(e) => tracing::warn!(operation, code = e.code(), "Operação de estoque rejeitada: {}", e),
        }
    }

    fn check_quantity(quantity: i64) -> Result<(), AppError> {
        if quantity < 0 {
            return Err(AppError::InvalidQuantity(quantity));
        }
        Ok(())
    }

    /// Política estrita: o código precisa resolver para exatamente um SKU.
    async fn resolve_one(
        &self,
        tenant_id: Option<&str>,
        seller_id: &str,
        sku_code: &str,
    ) -> Result<i64, AppError> {
        let codes = [sku_code.to_string()];
        let refs = self.skus.resolve_codes(tenant_id, seller_id, &codes).await?;

        match refs.as_slice() {
            [only] => Ok(only.sku_id),
            [] => Err(AppError::SkuNotFound(sku_code.to_string())),
            _ => Err(AppError::AmbiguousSku(sku_code.to_string())),
        }
    }

    async fn ensure_hub(&self, hub_id: i64) -> Result<(), AppError> {
        if !self.hubs.hub_exists(hub_id).await? {
            return Err(AppError::HubNotFound(hub_id));
        }
        Ok(())
    }

    // --- CREATE ---
    // Primeira atribuição de estoque para (hub, SKU). Não checa duplicidade
    // antes: a constraint UNIQUE responde com Conflict.
    pub async fn create(&self, deadline: Duration, cmd: StockAssignment) -> Result<Inventory, AppError> {
        tracing::info!(
            hub_id = cmd.hub_id,
            seller_id = %cmd.seller_id,
            sku_code = %cmd.sku_code,
            quantity = cmd.quantity,
            "Criando saldo de estoque"
        );
        Self::check_quantity(cmd.quantity)?;

        let result = Self::with_deadline(deadline, "create", async {
            let sku_id = self
                .resolve_one(Some(&cmd.tenant_id), &cmd.seller_id, &cmd.sku_code)
                .await?;
            self.ensure_hub(cmd.hub_id).await?;

            self.store
                .insert(&NewInventory {
                    tenant_id: cmd.tenant_id.clone(),
                    seller_id: cmd.seller_id.clone(),
                    sku_id,
                    hub_id: cmd.hub_id,
                    quantity: cmd.quantity,
                })
                .await
        })
        .await;

        Self::log_outcome("create", &result);
        result
    }

    // --- UPSERT ---
    pub async fn upsert(&self, deadline: Duration, cmd: StockAssignment) -> Result<Inventory, AppError> {
        tracing::info!(
            hub_id = cmd.hub_id,
            seller_id = %cmd.seller_id,
            sku_code = %cmd.sku_code,
            quantity = cmd.quantity,
            "Upsert de saldo de estoque"
        );
        Self::check_quantity(cmd.quantity)?;

        let result = Self::with_deadline(deadline, "upsert", async {
            let sku_id = self
                .resolve_one(Some(&cmd.tenant_id), &cmd.seller_id, &cmd.sku_code)
                .await?;
            self.ensure_hub(cmd.hub_id).await?;

            self.store
                .upsert_on_conflict(&NewInventory {
                    tenant_id: cmd.tenant_id.clone(),
                    seller_id: cmd.seller_id.clone(),
                    sku_id,
                    hub_id: cmd.hub_id,
                    quantity: cmd.quantity,
                })
                .await
        })
        .await;

        Self::log_outcome("upsert", &result);
        result
    }

    // --- ADJUST (delta) ---
    // Delta positivo = entrada, negativo = baixa. Se o saldo ficaria negativo,
    // a chamada é rejeitada e o valor gravado não muda.
    pub async fn adjust_quantity(&self, deadline: Duration, cmd: StockAdjustment) -> Result<Inventory, AppError> {
        tracing::info!(
            hub_id = cmd.hub_id,
            seller_id = %cmd.seller_id,
            sku = ?cmd.sku,
            delta = cmd.delta,
            "Ajustando quantidade em estoque"
        );

        let result = Self::with_deadline(deadline, "adjust_quantity", async {
            let sku_id = match &cmd.sku {
                SkuKey::Id(sku_id) => *sku_id,
                SkuKey::Code(code) => {
                    self.resolve_one(cmd.tenant_id.as_deref(), &cmd.seller_id, code)
                        .await?
                }
            };

            let key = InventoryKey {
                hub_id: cmd.hub_id,
                seller_id: cmd.seller_id.clone(),
                sku_id,
            };
            self.store.atomic_adjust(&key, cmd.delta).await
        })
        .await;

        Self::log_outcome("adjust_quantity", &result);
        result
    }

    // Remove repetidos mantendo a ordem e para no primeiro código além do limite.
    fn distinct_codes(codes: Vec<String>) -> Result<Vec<String>, AppError> {
        let mut seen: HashSet<String> = HashSet::with_capacity(MAX_SKU_CODES_PER_QUERY + 1);
        let mut distinct = Vec::with_capacity(MAX_SKU_CODES_PER_QUERY.min(codes.len()));

        for code in codes {
            if seen.insert(code.clone()) {
                if seen.len() > MAX_SKU_CODES_PER_QUERY {
                    return Err(AppError::TooManySkuCodes {
                        given: seen.len(),
                        max: MAX_SKU_CODES_PER_QUERY,
                    });
                }
                distinct.push(code);
            }
        }
        Ok(distinct)
    }

    // --- QUERY ---
    // Política leniente: códigos desconhecidos só não trazem linhas.
    // O tenant_id só entra no log: o saldo é filtrado por (hub, seller) e
    // pelos códigos, como no serviço anterior.
    pub async fn query(&self, deadline: Duration, query: InventoryQuery) -> Result<Vec<InventoryView>, AppError> {
        tracing::info!(
            hub_id = query.hub_id,
            seller_id = %query.seller_id,
            tenant_id = %query.tenant_id,
            codes = query.sku_codes.len(),
            "Consultando saldos de estoque"
        );

        let sku_codes = Self::distinct_codes(query.sku_codes).inspect_err(|e| {
            tracing::warn!(operation = "query", code = e.code(), "Operação de estoque rejeitada: {}", e)
        })?;

        let result = Self::with_deadline(
            deadline,
            "query",
            self.store
                .query_by_hub_seller(query.hub_id, &query.seller_id, &sku_codes),
        )
        .await;

        Self::log_outcome("query", &result);
        result
    }
}
