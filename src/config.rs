// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::{bail, Context};

use crate::{
    db::{pool::DbPools, MemoryStore, Stores},
    services::{HubService, InventoryService, SkuService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    // Sem banco: útil para rodar localmente e nos testes
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("STORAGE_BACKEND inválido: '{other}' (use 'postgres' ou 'memory')"),
        }
    }
}

// Configuração explícita, montada uma única vez no startup e passada adiante.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub server_host: String,
    pub server_port: u16,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub replica_database_urls: Vec<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    // Prazo padrão de cada operação (sobrescrevível por requisição)
    pub request_timeout: Duration,
    pub max_request_timeout: Duration,
}

impl AppConfig {
    /// Lê o `.env` (se existir) e as variáveis de ambiente do processo.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage_backend: StorageBackend = parse_or(&get, "STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = get("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida quando STORAGE_BACKEND=postgres");
        }

        let replica_database_urls = get("DATABASE_REPLICA_URLS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let request_timeout_ms: u64 = parse_or(&get, "REQUEST_TIMEOUT_MS", 5_000)?;
        let max_request_timeout_ms: u64 = parse_or(&get, "MAX_REQUEST_TIMEOUT_MS", 30_000)?;
        let db_acquire_timeout_secs: u64 = parse_or(&get, "DB_ACQUIRE_TIMEOUT_SECS", 3)?;
        let db_max_connections: u32 = parse_or(&get, "DB_MAX_CONNECTIONS", 5)?;

        if request_timeout_ms == 0 || max_request_timeout_ms == 0 {
            bail!("REQUEST_TIMEOUT_MS e MAX_REQUEST_TIMEOUT_MS devem ser maiores que zero");
        }
        if request_timeout_ms > max_request_timeout_ms {
            bail!("REQUEST_TIMEOUT_MS não pode ser maior que MAX_REQUEST_TIMEOUT_MS");
        }
        if db_max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS deve ser maior que zero");
        }

        Ok(Self {
            environment: get("APP_ENV").unwrap_or_else(|| "local".to_string()),
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&get, "SERVER_PORT", 3001)?,
            storage_backend,
            database_url,
            replica_database_urls,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(db_acquire_timeout_secs),
            request_timeout: Duration::from_millis(request_timeout_ms),
            max_request_timeout: Duration::from_millis(max_request_timeout_ms),
        })
    }

    pub fn is_local(&self) -> bool {
        self.environment == "local"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("valor inválido para {key}: '{raw}'")),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub hub_service: HubService,
    pub sku_service: SkuService,
    pub inventory_service: InventoryService,
}

impl AppState {
    // Conecta no armazenamento escolhido e monta o gráfico de dependências.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let stores = match config.storage_backend {
            StorageBackend::Postgres => {
                let pools = DbPools::connect(&config).await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(pools.primary())
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Stores::postgres(pools)
            }
            StorageBackend::Memory => {
                tracing::warn!("Usando armazenamento em memória: os dados somem ao reiniciar");
                Stores::memory(Arc::new(MemoryStore::new()))
            }
        };

        Ok(Self::with_stores(config, stores))
    }

    pub fn with_stores(config: AppConfig, stores: Stores) -> Self {
        let hub_service = HubService::new(stores.hubs.clone());
        let sku_service = SkuService::new(stores.skus.clone());
        let inventory_service = InventoryService::new(
            stores.inventory.clone(),
            stores.sku_resolver.clone(),
            stores.hub_validator.clone(),
        );

        Self {
            config: Arc::new(config),
            hub_service,
            sku_service,
            inventory_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn memory_backend_needs_no_database_url() {
        let config = config_from(&[("STORAGE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.server_port, 3001);
        assert_eq!(config.request_timeout, Duration::from_millis(5_000));
        assert!(config.is_local());
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        assert!(config_from(&[]).is_err());

        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/wms"),
            ("DATABASE_REPLICA_URLS", "postgres://r1/wms, ,postgres://r2/wms"),
            ("APP_ENV", "production"),
        ])
        .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Postgres);
        assert_eq!(config.replica_database_urls.len(), 2);
        assert!(!config.is_local());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config_from(&[("STORAGE_BACKEND", "redis")]).is_err());
        assert!(config_from(&[("STORAGE_BACKEND", "memory"), ("SERVER_PORT", "abc")]).is_err());
        assert!(config_from(&[("STORAGE_BACKEND", "memory"), ("REQUEST_TIMEOUT_MS", "0")]).is_err());
        assert!(
            config_from(&[
                ("STORAGE_BACKEND", "memory"),
                ("REQUEST_TIMEOUT_MS", "60000"),
                ("MAX_REQUEST_TIMEOUT_MS", "1000"),
            ])
            .is_err()
        );
    }
}
