// src/db/pool.rs

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

// Pool do primário (escritas + pré-checagens do Ledger) e, opcionalmente,
// pools de réplicas para as leituras de listagem/consulta.
#[derive(Clone)]
pub struct DbPools {
    primary: PgPool,
    replicas: Arc<Vec<PgPool>>,
    next_replica: Arc<AtomicUsize>,
}

impl DbPools {
    pub fn new(primary: PgPool, replicas: Vec<PgPool>) -> Self {
        Self {
            primary,
            replicas: Arc::new(replicas),
            next_replica: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let database_url = config
            .database_url
            .as_deref()
            .context("DATABASE_URL deve ser definida")?;

        let primary = Self::open(config, database_url)
            .await
            .context("Falha ao conectar no banco primário")?;

        let mut replicas = Vec::with_capacity(config.replica_database_urls.len());
        for (index, url) in config.replica_database_urls.iter().enumerate() {
            let replica = Self::open(config, url)
                .await
                .with_context(|| format!("Falha ao conectar na réplica #{}", index + 1))?;
            tracing::info!(replica = index + 1, "Réplica de leitura configurada");
            replicas.push(replica);
        }

        Ok(Self::new(primary, replicas))
    }

    async fn open(config: &AppConfig, url: &str) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(url)
            .await
    }

    pub fn primary(&self) -> &PgPool {
        &self.primary
    }

    /// Próxima réplica (round-robin), ou o primário se não houver réplicas.
    pub fn reader(&self) -> &PgPool {
        if self.replicas.is_empty() {
            return &self.primary;
        }
        let index = self.next_replica.fetch_add(1, Ordering::Relaxed) % self.replicas.len();
        &self.replicas[index]
    }
}
