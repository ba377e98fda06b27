// src/common/logging.rs

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Inicializa o logger do processo.
///
/// Em `local`: nível debug e saída compacta legível. Nos demais ambientes:
/// nível info e uma linha JSON por evento. `RUST_LOG` sempre tem precedência.
/// Chamadas repetidas são ignoradas.
pub fn init(config: &AppConfig) {
    let default_level = if config.is_local() { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = if config.is_local() {
        builder.compact().try_init()
    } else {
        builder.json().try_init()
    };
}
